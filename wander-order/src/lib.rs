pub mod models;
pub mod manager;

pub use models::{Order, OrderRequest, OrderStatus};
pub use manager::OrderLedger;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Offer {0} must be accepted before travel can be confirmed")]
    NotAccepted(String),

    #[error("Party size must be at least 1")]
    EmptyParty,

    #[error("Party of {requested} exceeds offer capacity of {capacity}")]
    OverCapacity { requested: u32, capacity: u32 },

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: String,
        to: String,
    },
}
