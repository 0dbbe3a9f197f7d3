pub mod commands;
pub mod error;
pub mod render;
pub mod state;

pub use commands::Command;
pub use error::AppError;
pub use state::AppState;
