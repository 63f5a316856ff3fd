use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ListResult, OrderStatus, SubOrder};
use crate::domain::ports::OrderLedger;

pub struct OrderService {
    ledger: Arc<dyn OrderLedger>,
}

impl OrderService {
    pub fn new(ledger: Arc<dyn OrderLedger>) -> Self {
        Self { ledger }
    }

    pub async fn get_order(&self, order_id: &str) -> Result<SubOrder, DomainError> {
        self.ledger
            .find_order(order_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id}")))
    }

    pub async fn list_seller_orders(
        &self,
        seller_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.ledger.list_seller_orders(seller_id, page, limit).await
    }

    pub async fn list_buyer_orders(
        &self,
        buyer_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.ledger.list_buyer_orders(buyer_id, page, limit).await
    }

    /// Moves a sub-order along its fulfillment lifecycle in both ledgers.
    pub async fn update_status(
        &self,
        order_id: &str,
        next: OrderStatus,
    ) -> Result<SubOrder, DomainError> {
        let order = self.ledger.update_status(order_id, next).await?;
        log::info!("Order {} moved to {}", order.order_id, order.status);
        Ok(order)
    }
}
