use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::{CartLine, ProductSnapshot};
use super::checkout::CheckoutCommit;
use super::errors::{CheckoutError, DomainError};
use super::order::{ListResult, OrderStatus, SubOrder};
use super::payment::{IdempotencyKey, VerifiedPayment};

#[async_trait]
pub trait ProductCatalog: Send + Sync + 'static {
    async fn find_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError>;
}

#[async_trait]
pub trait CartStore: Send + Sync + 'static {
    async fn cart_lines(&self, buyer_id: Uuid) -> Result<Vec<CartLine>, DomainError>;
    async fn set_quantity(&self, buyer_id: Uuid, line: CartLine) -> Result<(), DomainError>;
    /// Returns `false` when the buyer had no such line.
    async fn remove_line(&self, buyer_id: Uuid, product_id: Uuid) -> Result<bool, DomainError>;
}

/// Global and seller-scoped order ledgers, written together.
#[async_trait]
pub trait OrderLedger: Send + Sync + 'static {
    /// Master order number already recorded for this key, if any.
    async fn find_submission(&self, key: &IdempotencyKey) -> Result<Option<String>, DomainError>;

    /// Records every sub-order in both ledgers, records the submission and
    /// empties the buyer's cart. All or nothing.
    async fn commit_checkout(&self, commit: CheckoutCommit) -> Result<(), CheckoutError>;

    async fn find_order(&self, order_id: &str) -> Result<Option<SubOrder>, DomainError>;
    async fn list_seller_orders(
        &self,
        seller_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
    async fn list_buyer_orders(
        &self,
        buyer_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
    async fn update_status(&self, order_id: &str, next: OrderStatus)
        -> Result<SubOrder, DomainError>;
}

#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, CheckoutError>;
}

pub trait OrderNumberSource: Send + Sync + 'static {
    fn next_master_number(&self, placed_at: DateTime<Utc>) -> String;
}
