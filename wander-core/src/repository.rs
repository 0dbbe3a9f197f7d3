use async_trait::async_trait;
use uuid::Uuid;
use wander_catalog::{DecisionStatus, Offer};
use wander_order::{Order, OrderRequest};
use crate::search::CatalogQuery;

/// Where offers come from and where decisions are persisted
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Offers matching whatever criteria the source can apply itself
    async fn fetch_catalog(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<Offer>, Box<dyn std::error::Error + Send + Sync>>;

    /// Offers for `query` with its price window removed
    async fn fetch_unfiltered_catalog_for_bounds(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<Offer>, Box<dyn std::error::Error + Send + Sync>>;

    /// Full record including the extended description
    async fn fetch_offer_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<Offer>, Box<dyn std::error::Error + Send + Sync>>;

    async fn set_status(
        &self,
        id: Uuid,
        status: DecisionStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn set_note(
        &self,
        id: Uuid,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Accepts validated travel requests and carries them through their lifecycle.
///
/// Lifecycle refusals come back as a boxed `OrderError` so callers can tell
/// them apart from transport failures.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>>;

    async fn confirm_order(
        &self,
        order_id: Uuid,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>>;

    async fn cancel_order(
        &self,
        order_id: Uuid,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>>;

    async fn orders_for_offer(
        &self,
        offer_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>>;
}
