use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde_json::json;
use tokio::task::JoinError;
use uuid::Uuid;

use crate::db::{run_blocking, DbPool};
use crate::domain::checkout::CheckoutCommit;
use crate::domain::errors::{CheckoutError, DomainError};
use crate::domain::order::{page_offset, ListResult, OrderStatus, SubOrder};
use crate::domain::payment::IdempotencyKey;
use crate::domain::ports::OrderLedger;
use crate::schema::{
    cart_lines, checkout_submissions, commerce_order_outbox, order_items, orders, seller_orders,
};

use super::models::{
    NewOrderItemRow, NewOrderRow, NewOutboxEventRow, NewSellerOrderRow, NewSubmissionRow,
    OrderItemRow, OrderRow, SellerOrderRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<JoinError> for DomainError {
    fn from(e: JoinError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<diesel::result::Error> for CheckoutError {
    fn from(e: diesel::result::Error) -> Self {
        CheckoutError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for CheckoutError {
    fn from(e: r2d2::Error) -> Self {
        CheckoutError::Persistence(e.to_string())
    }
}

impl From<JoinError> for CheckoutError {
    fn from(e: JoinError) -> Self {
        CheckoutError::Persistence(e.to_string())
    }
}

// ── Ledger ────────────────────────────────────────────────────────────────────

const AGGREGATE_TYPE: &str = "Order";

pub struct DieselOrderLedger {
    pool: DbPool,
}

impl DieselOrderLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CheckoutError> {
    serde_json::to_value(value).map_err(|e| CheckoutError::Persistence(e.to_string()))
}

/// Writes one checkout. Must run inside a transaction: an early return
/// leaves nothing behind.
fn write_checkout(conn: &mut PgConnection, commit: &CheckoutCommit) -> Result<(), CheckoutError> {
    // 1. Claim the idempotency key. A second claim inserts nothing.
    let claimed = diesel::insert_into(checkout_submissions::table)
        .values(&NewSubmissionRow {
            idempotency_key: commit.idempotency_key.as_str().to_string(),
            buyer_id: commit.buyer_id,
            master_order_number: commit.master_order_number.clone(),
        })
        .on_conflict_do_nothing()
        .execute(conn)?;

    if claimed == 0 {
        let master_order_number = checkout_submissions::table
            .filter(checkout_submissions::idempotency_key.eq(commit.idempotency_key.as_str()))
            .select(checkout_submissions::master_order_number)
            .first::<String>(conn)?;
        return Err(CheckoutError::DuplicateSubmission {
            master_order_number,
        });
    }

    for order in &commit.sub_orders {
        let shipping_address = to_json(&order.shipping_address)?;
        let status = order.status.as_str().to_string();

        // 2. Global ledger
        diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                id: order.order_id.clone(),
                master_order_number: order.master_order_number.clone(),
                seller_id: order.seller_id,
                buyer_id: order.buyer_id,
                subtotal: order.subtotal,
                shipping_fee: order.shipping_fee,
                tax_amount: order.tax_amount,
                grand_total: order.grand_total,
                status: status.clone(),
                payment_reference: order.payment_reference.clone(),
                shipping_address: shipping_address.clone(),
                created_at: order.created_at,
                updated_at: order.created_at,
            })
            .execute(conn)?;

        let item_rows: Vec<NewOrderItemRow> = order
            .items
            .iter()
            .zip(0i32..)
            .map(|(item, position)| NewOrderItemRow {
                id: Uuid::new_v4(),
                order_id: order.order_id.clone(),
                position,
                product_id: item.product_id,
                name: item.name.clone(),
                unit_price: item.unit_price,
                quantity: item.quantity,
                image_url: item.image_url.clone(),
            })
            .collect();
        diesel::insert_into(order_items::table)
            .values(&item_rows)
            .execute(conn)?;

        // 3. Seller-scoped copy of the same sub-order
        diesel::insert_into(seller_orders::table)
            .values(&NewSellerOrderRow {
                seller_id: order.seller_id,
                order_id: order.order_id.clone(),
                master_order_number: order.master_order_number.clone(),
                buyer_id: order.buyer_id,
                items: to_json(&order.items)?,
                subtotal: order.subtotal,
                shipping_fee: order.shipping_fee,
                tax_amount: order.tax_amount,
                grand_total: order.grand_total,
                status,
                payment_reference: order.payment_reference.clone(),
                shipping_address,
                created_at: order.created_at,
                updated_at: order.created_at,
            })
            .execute(conn)?;

        // 4. Outbox event so the seller hears about the new order.
        diesel::insert_into(commerce_order_outbox::table)
            .values(&NewOutboxEventRow {
                id: Uuid::new_v4(),
                aggregate_type: AGGREGATE_TYPE.to_string(),
                aggregate_id: order.order_id.clone(),
                event_type: "SubOrderPlaced".to_string(),
                payload: json!({
                    "order_id": order.order_id,
                    "master_order_number": order.master_order_number,
                    "seller_id": order.seller_id,
                    "buyer_id": order.buyer_id,
                    "grand_total": order.grand_total,
                    "status": order.status.as_str(),
                    "items": to_json(&order.items)?,
                }),
            })
            .execute(conn)?;
    }

    // 5. Empty the buyer's cart.
    diesel::delete(cart_lines::table.filter(cart_lines::buyer_id.eq(commit.buyer_id)))
        .execute(conn)?;

    Ok(())
}

fn load_order(conn: &mut PgConnection, row: OrderRow) -> Result<SubOrder, DomainError> {
    let items = order_items::table
        .filter(order_items::order_id.eq(&row.id))
        .order(order_items::position.asc())
        .select(OrderItemRow::as_select())
        .load(conn)?;
    row.into_sub_order(items)
}

#[async_trait]
impl OrderLedger for DieselOrderLedger {
    async fn find_submission(&self, key: &IdempotencyKey) -> Result<Option<String>, DomainError> {
        let key = key.as_str().to_string();
        run_blocking(&self.pool, move |conn| {
            Ok(checkout_submissions::table
                .filter(checkout_submissions::idempotency_key.eq(key))
                .select(checkout_submissions::master_order_number)
                .first::<String>(conn)
                .optional()?)
        })
        .await
    }

    async fn commit_checkout(&self, commit: CheckoutCommit) -> Result<(), CheckoutError> {
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, CheckoutError, _>(|conn| write_checkout(conn, &commit))
        })
        .await
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<SubOrder>, DomainError> {
        let order_id = order_id.to_string();
        run_blocking(&self.pool, move |conn| {
            let order = orders::table
                .filter(orders::id.eq(&order_id))
                .select(OrderRow::as_select())
                .first(conn)
                .optional()?;

            let Some(order) = order else {
                return Ok(None);
            };

            load_order(conn, order).map(Some)
        })
        .await
    }

    async fn list_seller_orders(
        &self,
        seller_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let offset = page_offset(page, limit)?;
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DomainError, _>(|conn| {
                let total: i64 = seller_orders::table
                    .filter(seller_orders::seller_id.eq(seller_id))
                    .count()
                    .get_result(conn)?;

                let rows = seller_orders::table
                    .filter(seller_orders::seller_id.eq(seller_id))
                    .select(SellerOrderRow::as_select())
                    .order(seller_orders::created_at.desc())
                    .limit(limit)
                    .offset(offset)
                    .load(conn)?;

                Ok(ListResult {
                    items: rows
                        .into_iter()
                        .map(SellerOrderRow::into_sub_order)
                        .collect::<Result<_, _>>()?,
                    total,
                })
            })
        })
        .await
    }

    async fn list_buyer_orders(
        &self,
        buyer_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let offset = page_offset(page, limit)?;
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DomainError, _>(|conn| {
                let total: i64 = orders::table
                    .filter(orders::buyer_id.eq(buyer_id))
                    .count()
                    .get_result(conn)?;

                let rows = orders::table
                    .filter(orders::buyer_id.eq(buyer_id))
                    .select(OrderRow::as_select())
                    .order(orders::created_at.desc())
                    .limit(limit)
                    .offset(offset)
                    .load(conn)?;

                Ok(ListResult {
                    items: rows
                        .into_iter()
                        .map(|o| o.into_sub_order(vec![]))
                        .collect::<Result<_, _>>()?,
                    total,
                })
            })
        })
        .await
    }

    async fn update_status(
        &self,
        order_id: &str,
        next: OrderStatus,
    ) -> Result<SubOrder, DomainError> {
        let order_id = order_id.to_string();
        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DomainError, _>(|conn| {
                let order = orders::table
                    .filter(orders::id.eq(&order_id))
                    .select(OrderRow::as_select())
                    .for_update()
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| DomainError::NotFound(format!("order {order_id}")))?;

                let current: OrderStatus = order.status.parse()?;
                let next = current.transition_to(next)?;
                let now = Utc::now();

                diesel::update(orders::table.filter(orders::id.eq(&order_id)))
                    .set((orders::status.eq(next.as_str()), orders::updated_at.eq(now)))
                    .execute(conn)?;

                let copies = diesel::update(
                    seller_orders::table
                        .filter(seller_orders::seller_id.eq(order.seller_id))
                        .filter(seller_orders::order_id.eq(&order_id)),
                )
                .set((
                    seller_orders::status.eq(next.as_str()),
                    seller_orders::updated_at.eq(now),
                ))
                .execute(conn)?;
                if copies != 1 {
                    return Err(DomainError::Internal(format!(
                        "seller ledger has {copies} copies of order {order_id}"
                    )));
                }

                diesel::insert_into(commerce_order_outbox::table)
                    .values(&NewOutboxEventRow {
                        id: Uuid::new_v4(),
                        aggregate_type: AGGREGATE_TYPE.to_string(),
                        aggregate_id: order_id.clone(),
                        event_type: "SubOrderStatusChanged".to_string(),
                        payload: json!({
                            "order_id": order_id,
                            "seller_id": order.seller_id,
                            "buyer_id": order.buyer_id,
                            "from": current.as_str(),
                            "to": next.as_str(),
                        }),
                    })
                    .execute(conn)?;

                let updated = orders::table
                    .filter(orders::id.eq(&order_id))
                    .select(OrderRow::as_select())
                    .first(conn)?;
                load_order(conn, updated)
            })
        })
        .await
    }
}
