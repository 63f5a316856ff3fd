use std::sync::Arc;

use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartStore, ProductCatalog};

pub struct CartService {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn ProductCatalog>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartStore>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { carts, catalog }
    }

    pub async fn view_cart(&self, buyer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        self.carts.cart_lines(buyer_id).await
    }

    /// Adds the product or replaces its quantity.
    pub async fn set_quantity(
        &self,
        buyer_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        if self.catalog.find_product(product_id).await?.is_none() {
            return Err(DomainError::NotFound(format!("product {product_id}")));
        }

        let line = CartLine {
            product_id,
            quantity,
        };
        self.carts.set_quantity(buyer_id, line).await?;
        Ok(line)
    }

    pub async fn remove_item(&self, buyer_id: Uuid, product_id: Uuid) -> Result<(), DomainError> {
        if self.carts.remove_line(buyer_id, product_id).await? {
            Ok(())
        } else {
            Err(DomainError::NotFound(format!(
                "product {product_id} is not in the cart"
            )))
        }
    }
}
