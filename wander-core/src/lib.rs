pub mod search;
pub mod repository;
pub mod session;

pub use repository::{OfferSource, OrderSink};
pub use search::CatalogQuery;
pub use session::{BoundsRequest, RefreshPlan, TriageSession};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Collaborator call failed: {0}")]
    CollaboratorError(String),
    #[error(transparent)]
    Order(#[from] wander_order::OrderError),
}

pub type CoreResult<T> = Result<T, CoreError>;
