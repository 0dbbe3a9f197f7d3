pub mod models;
pub mod pii;

pub use models::events::TriageEvent;
pub use pii::Masked;
