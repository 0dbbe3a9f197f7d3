use crate::models::{Order, OrderRequest, OrderStatus};
use crate::OrderError;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Keeps placed orders and their lifecycle
pub struct OrderLedger {
    orders: HashMap<Uuid, Order>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Record a new order in PENDING state
    pub fn place(&mut self, request: &OrderRequest) -> Order {
        let order = Order::from_request(request);
        info!(order_id = %order.id, offer_id = %order.offer_id, party_size = order.party_size, "Order placed");
        self.orders.insert(order.id, order.clone());
        order
    }

    /// Orders placed for one offer, oldest first
    pub fn orders_for_offer(&self, offer_id: &Uuid) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .values()
            .filter(|o| o.offer_id == *offer_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        orders
    }

    /// Transition: Pending → Confirmed
    pub fn confirm(&mut self, order_id: &Uuid) -> Result<Order, OrderError> {
        let order = self.get_order_mut(order_id)?;

        if order.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: order.status.as_str().to_string(),
                to: "CONFIRMED".to_string(),
            });
        }

        order.update_status(OrderStatus::Confirmed);
        info!(order_id = %order.id, "Order confirmed");
        Ok(order.clone())
    }

    /// Transition: Pending | Confirmed → Cancelled
    pub fn cancel(&mut self, order_id: &Uuid) -> Result<Order, OrderError> {
        let order = self.get_order_mut(order_id)?;

        if order.status == OrderStatus::Cancelled {
            return Err(OrderError::InvalidTransition {
                from: order.status.as_str().to_string(),
                to: "CANCELLED".to_string(),
            });
        }

        order.update_status(OrderStatus::Cancelled);
        info!(order_id = %order.id, "Order cancelled");
        Ok(order.clone())
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn get_order_mut(&mut self, order_id: &Uuid) -> Result<&mut Order, OrderError> {
        self.orders.get_mut(order_id)
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
    }
}

impl Default for OrderLedger {
    fn default() -> Self {
        Self::new()
    }
}
