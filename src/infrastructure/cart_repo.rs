use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{run_blocking, DbPool};
use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartStore;
use crate::schema::cart_lines;

use super::models::{CartLineRow, NewCartLineRow};

pub struct DieselCartStore {
    pool: DbPool,
}

impl DieselCartStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartStore for DieselCartStore {
    async fn cart_lines(&self, buyer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        run_blocking(&self.pool, move |conn| {
            let rows = cart_lines::table
                .filter(cart_lines::buyer_id.eq(buyer_id))
                .order((cart_lines::updated_at.asc(), cart_lines::product_id.asc()))
                .select(CartLineRow::as_select())
                .load(conn)?;
            Ok(rows.into_iter().map(CartLine::from).collect())
        })
        .await
    }

    async fn set_quantity(&self, buyer_id: Uuid, line: CartLine) -> Result<(), DomainError> {
        run_blocking(&self.pool, move |conn| {
            let now = Utc::now();
            diesel::insert_into(cart_lines::table)
                .values(&NewCartLineRow {
                    buyer_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    updated_at: now,
                })
                .on_conflict((cart_lines::buyer_id, cart_lines::product_id))
                .do_update()
                .set(cart_lines::quantity.eq(line.quantity))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn remove_line(&self, buyer_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        run_blocking(&self.pool, move |conn| {
            let deleted = diesel::delete(
                cart_lines::table
                    .filter(cart_lines::buyer_id.eq(buyer_id))
                    .filter(cart_lines::product_id.eq(product_id)),
            )
            .execute(conn)?;
            Ok(deleted > 0)
        })
        .await
    }
}
