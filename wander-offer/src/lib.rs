pub mod config;
pub mod status;
pub mod filter;
pub mod sort;
pub mod pipeline;
pub mod highlight;
pub mod metrics;
pub mod skip;
pub mod comparison;
pub mod debounce;

pub use config::TriageConfig;
pub use status::{StatusGesture, StatusMachine, Transition};
pub use filter::{FilterCriteria, Predicate, PriceRange};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use pipeline::{apply, group_by_status, StatusGroups};
pub use highlight::{Favorability, HighlightPair, Highlighter, Tint};
pub use metrics::{ComparisonMetric, ComparisonReport, MetricKind, OfferFigures};
pub use skip::resolve_skip;
pub use comparison::{Comparison, ComparisonSelection, ComparisonView, Side};
pub use debounce::{Debouncer, RequestTicket, RequestTracker};

#[derive(Debug, thiserror::Error)]
pub enum OfferError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("Unknown comparison side: {0}")]
    UnknownSide(String),
}
