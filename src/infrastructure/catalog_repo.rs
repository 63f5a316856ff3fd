use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{run_blocking, DbPool};
use crate::domain::cart::ProductSnapshot;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductCatalog;
use crate::schema::products;

use super::models::ProductRow;

pub struct DieselProductCatalog {
    pool: DbPool,
}

impl DieselProductCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for DieselProductCatalog {
    async fn find_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        run_blocking(&self.pool, move |conn| {
            let row = products::table
                .filter(products::id.eq(product_id))
                .select(ProductRow::as_select())
                .first(conn)
                .optional()?;
            Ok(row.map(ProductSnapshot::from))
        })
        .await
    }
}
