use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::cart::{CartLine, ProductSnapshot};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderLineItem, OrderStatus, ShippingAddress, SubOrder};
use crate::schema::{
    cart_lines, checkout_submissions, commerce_order_outbox, order_items, orders, products,
    seller_orders,
};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub shipping_fee_per_unit: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductSnapshot {
    fn from(row: ProductRow) -> Self {
        ProductSnapshot {
            product_id: row.id,
            seller_id: row.seller_id,
            name: row.name,
            unit_price: row.unit_price,
            shipping_fee_per_unit: row.shipping_fee_per_unit,
            image_url: row.image_url,
        }
    }
}

#[cfg(test)]
#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub shipping_fee_per_unit: i64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cart_lines)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        CartLine {
            product_id: row.product_id,
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_lines)]
pub struct NewCartLineRow {
    pub buyer_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: String,
    pub master_order_number: String,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub tax_amount: i64,
    pub grand_total: i64,
    pub status: String,
    pub payment_reference: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: String,
    pub master_order_number: String,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub tax_amount: i64,
    pub grand_total: i64,
    pub status: String,
    pub payment_reference: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: Uuid,
    pub order_id: String,
    pub position: i32,
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub image_url: Option<String>,
}

impl From<OrderItemRow> for OrderLineItem {
    fn from(row: OrderItemRow) -> Self {
        OrderLineItem {
            product_id: row.product_id,
            name: row.name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub id: Uuid,
    pub order_id: String,
    pub position: i32,
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = seller_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SellerOrderRow {
    pub seller_id: Uuid,
    pub order_id: String,
    pub master_order_number: String,
    pub buyer_id: Uuid,
    pub items: Value,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub tax_amount: i64,
    pub grand_total: i64,
    pub status: String,
    pub payment_reference: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = seller_orders)]
pub struct NewSellerOrderRow {
    pub seller_id: Uuid,
    pub order_id: String,
    pub master_order_number: String,
    pub buyer_id: Uuid,
    pub items: Value,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub tax_amount: i64,
    pub grand_total: i64,
    pub status: String,
    pub payment_reference: String,
    pub shipping_address: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = checkout_submissions)]
pub struct NewSubmissionRow {
    pub idempotency_key: String,
    pub buyer_id: Uuid,
    pub master_order_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = commerce_order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = commerce_order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}

// ── Row → domain ─────────────────────────────────────────────────────────────

fn corrupt(order_id: &str, what: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::Internal(format!("order {order_id} has unreadable {what}: {e}"))
}

fn parse_status(order_id: &str, status: &str) -> Result<OrderStatus, DomainError> {
    status.parse().map_err(|e| corrupt(order_id, "status", e))
}

fn parse_address(order_id: &str, value: Value) -> Result<ShippingAddress, DomainError> {
    serde_json::from_value(value).map_err(|e| corrupt(order_id, "shipping address", e))
}

impl OrderRow {
    pub fn into_sub_order(self, items: Vec<OrderItemRow>) -> Result<SubOrder, DomainError> {
        let status = parse_status(&self.id, &self.status)?;
        let shipping_address = parse_address(&self.id, self.shipping_address)?;
        Ok(SubOrder {
            order_id: self.id,
            master_order_number: self.master_order_number,
            seller_id: self.seller_id,
            buyer_id: self.buyer_id,
            items: items.into_iter().map(OrderLineItem::from).collect(),
            subtotal: self.subtotal,
            shipping_fee: self.shipping_fee,
            tax_amount: self.tax_amount,
            grand_total: self.grand_total,
            status,
            payment_reference: self.payment_reference,
            shipping_address,
            created_at: self.created_at,
        })
    }
}

impl SellerOrderRow {
    pub fn into_sub_order(self) -> Result<SubOrder, DomainError> {
        let status = parse_status(&self.order_id, &self.status)?;
        let shipping_address = parse_address(&self.order_id, self.shipping_address)?;
        let items: Vec<OrderLineItem> =
            serde_json::from_value(self.items).map_err(|e| corrupt(&self.order_id, "items", e))?;
        Ok(SubOrder {
            order_id: self.order_id,
            master_order_number: self.master_order_number,
            seller_id: self.seller_id,
            buyer_id: self.buyer_id,
            items,
            subtotal: self.subtotal,
            shipping_fee: self.shipping_fee,
            tax_amount: self.tax_amount,
            grand_total: self.grand_total,
            status,
            payment_reference: self.payment_reference,
            shipping_address,
            created_at: self.created_at,
        })
    }
}
