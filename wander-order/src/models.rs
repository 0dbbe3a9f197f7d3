use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use wander_catalog::{DecisionStatus, Offer, TransportMode};
use crate::OrderError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

/// A validated request to book an accepted offer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    pub offer_id: Uuid,
    pub party_size: u32,
    pub transport_mode: TransportMode,
}

impl OrderRequest {
    /// Only accepted offers can be booked, for a party that fits the declared capacity
    pub fn new(offer: &Offer, party_size: u32, transport_mode: TransportMode) -> Result<Self, OrderError> {
        if offer.status != DecisionStatus::Accepted {
            return Err(OrderError::NotAccepted(offer.id.to_string()));
        }
        if party_size == 0 {
            return Err(OrderError::EmptyParty);
        }
        if offer.capacity_total > 0 && party_size > offer.capacity_total {
            return Err(OrderError::OverCapacity {
                requested: party_size,
                capacity: offer.capacity_total,
            });
        }

        Ok(Self { offer_id: offer.id, party_size, transport_mode })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub offer_id: Uuid,
    pub party_size: u32,
    pub transport_mode: TransportMode,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn from_request(request: &OrderRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            offer_id: request.offer_id,
            party_size: request.party_size,
            transport_mode: request.transport_mode,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_status(&mut self, new_status: OrderStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(capacity: u32) -> Offer {
        Offer::new("Split", "Brno")
            .with_status(DecisionStatus::Accepted)
            .with_capacity(capacity)
    }

    #[test]
    fn test_request_requires_accepted_offer() {
        let offer = Offer::new("Split", "Brno");
        let result = OrderRequest::new(&offer, 2, TransportMode::Plane);
        assert!(matches!(result, Err(OrderError::NotAccepted(_))));
    }

    #[test]
    fn test_request_party_size_limits() {
        assert!(matches!(
            OrderRequest::new(&accepted(4), 0, TransportMode::Plane),
            Err(OrderError::EmptyParty)
        ));
        assert!(matches!(
            OrderRequest::new(&accepted(4), 5, TransportMode::Plane),
            Err(OrderError::OverCapacity { requested: 5, capacity: 4 })
        ));
        assert!(OrderRequest::new(&accepted(4), 4, TransportMode::Plane).is_ok());

        // No declared capacity means no upper limit
        assert!(OrderRequest::new(&accepted(0), 40, TransportMode::CarOwn).is_ok());
    }

    #[test]
    fn test_order_starts_pending() {
        let offer = accepted(2);
        let request = OrderRequest::new(&offer, 2, TransportMode::TrainBus).unwrap();
        let order = Order::from_request(&request);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.offer_id, offer.id);
        assert_eq!(order.transport_mode, TransportMode::TrainBus);
    }
}
