pub mod offer;
pub mod bounds;
pub mod ingest;

pub use offer::{DecisionStatus, Offer, Season, StayType, TransportMode};
pub use bounds::{BoundsCalculator, BoundsConfig, PriceBounds};
pub use ingest::{ingest, parse_catalog};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Offer {id} has date_to on or before date_from")]
    InvalidDateRange { id: String },

    #[error("Unknown decision status: {0}")]
    UnknownStatus(String),

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Unknown stay type: {0}")]
    UnknownStayType(String),

    #[error("Unknown transport mode: {0}")]
    UnknownTransportMode(String),

    #[error("Catalog payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}
