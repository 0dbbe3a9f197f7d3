pub mod app_config;
pub mod memory_repo;

pub use app_config::Config;
pub use memory_repo::MemoryOfferStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Could not read catalog fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Catalog(#[from] wander_catalog::CatalogError),

    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Offer store is refusing writes")]
    WritesDisabled,
}
