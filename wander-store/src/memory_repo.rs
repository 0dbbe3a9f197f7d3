use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;
use wander_catalog::{parse_catalog, DecisionStatus, Offer};
use wander_core::repository::{OfferSource, OrderSink};
use wander_core::CatalogQuery;
use wander_offer::apply;
use wander_order::{Order, OrderLedger, OrderRequest};
use crate::StoreError;

/// Offer source and order sink held entirely in memory.
///
/// Applies the full filter/sort pipeline server-side, so the session's own
/// pass over the response is a no-op for settled criteria.
pub struct MemoryOfferStore {
    offers: RwLock<Vec<Offer>>,
    orders: Mutex<OrderLedger>,
    refuse_writes: AtomicBool,
}

impl MemoryOfferStore {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers: RwLock::new(offers),
            orders: Mutex::new(OrderLedger::new()),
            refuse_writes: AtomicBool::new(false),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(Self::new(parse_catalog(text)?))
    }

    pub async fn from_fixture(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|source| StoreError::Fixture {
            path: path.display().to_string(),
            source,
        })?;
        let offers = parse_catalog(&text)?;
        info!(path = %path.display(), offers = offers.len(), "Catalog fixture loaded");
        Ok(Self::new(offers))
    }

    /// Make every subsequent write fail until switched back
    pub fn set_refuse_writes(&self, refuse: bool) {
        self.refuse_writes.store(refuse, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> Vec<Offer> {
        self.offers.read().await.clone()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.refuse_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WritesDisabled);
        }
        Ok(())
    }

    async fn update<F>(&self, id: Uuid, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Offer),
    {
        self.check_writable()?;
        let mut offers = self.offers.write().await;
        let offer = offers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::OfferNotFound(id.to_string()))?;
        change(offer);
        Ok(())
    }
}

#[async_trait]
impl OfferSource for MemoryOfferStore {
    async fn fetch_catalog(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<Offer>, Box<dyn std::error::Error + Send + Sync>> {
        let offers = self.offers.read().await;
        let result = apply(&offers, &query.criteria, &query.sort);
        debug!(matched = result.len(), total = offers.len(), "Catalog query served");
        Ok(result)
    }

    async fn fetch_unfiltered_catalog_for_bounds(
        &self,
        query: &CatalogQuery,
    ) -> Result<Vec<Offer>, Box<dyn std::error::Error + Send + Sync>> {
        let offers = self.offers.read().await;
        Ok(apply(&offers, &query.criteria.without_price(), &query.sort))
    }

    async fn fetch_offer_detail(
        &self,
        id: Uuid,
    ) -> Result<Option<Offer>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.offers.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: DecisionStatus,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.update(id, |offer| offer.status = status).await?;
        Ok(())
    }

    async fn set_note(
        &self,
        id: Uuid,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let note = (!text.trim().is_empty()).then(|| text.to_string());
        self.update(id, |offer| offer.note = note).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderSink for MemoryOfferStore {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        self.check_writable()?;
        let known = self.offers.read().await.iter().any(|o| o.id == request.offer_id);
        if !known {
            return Err(StoreError::OfferNotFound(request.offer_id.to_string()).into());
        }
        Ok(self.orders.lock().await.place(request))
    }

    async fn confirm_order(
        &self,
        order_id: Uuid,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        self.check_writable()?;
        Ok(self.orders.lock().await.confirm(&order_id)?)
    }

    async fn cancel_order(
        &self,
        order_id: Uuid,
    ) -> Result<Order, Box<dyn std::error::Error + Send + Sync>> {
        self.check_writable()?;
        Ok(self.orders.lock().await.cancel(&order_id)?)
    }

    async fn orders_for_offer(
        &self,
        offer_id: Uuid,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.orders.lock().await.orders_for_offer(&offer_id))
    }
}
