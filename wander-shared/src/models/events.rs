use uuid::Uuid;
use crate::pii::Masked;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct StatusChangedEvent {
    pub offer_id: Uuid,
    pub from: String,
    pub to: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct NoteSavedEvent {
    pub offer_id: Uuid,
    pub note: Masked<String>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderRequestedEvent {
    pub order_id: Uuid,
    pub offer_id: Uuid,
    pub party_size: u32,
    pub transport_mode: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub offer_id: Uuid,
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct CatalogRefreshedEvent {
    pub request_id: u64,
    pub offer_count: usize,
    pub timestamp: i64,
}

/// Everything the triage session announces to its presentation layer.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriageEvent {
    StatusChanged(StatusChangedEvent),
    NoteSaved(NoteSavedEvent),
    OrderRequested(OrderRequestedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
    CatalogRefreshed(CatalogRefreshedEvent),
}

impl TriageEvent {
    pub fn offer_id(&self) -> Option<Uuid> {
        match self {
            TriageEvent::StatusChanged(e) => Some(e.offer_id),
            TriageEvent::NoteSaved(e) => Some(e.offer_id),
            TriageEvent::OrderRequested(e) => Some(e.offer_id),
            TriageEvent::OrderStatusChanged(e) => Some(e.offer_id),
            TriageEvent::CatalogRefreshed(_) => None,
        }
    }
}
