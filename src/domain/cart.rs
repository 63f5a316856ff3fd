use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::CheckoutError;

/// One line of a buyer's cart. Only the product and the quantity are ever
/// taken from the buyer; prices always come from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Catalog view of a product at the instant of checkout. Money is in minor
/// currency units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub shipping_fee_per_unit: i64,
    pub image_url: Option<String>,
}

/// A cart line joined with its authoritative catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedLine {
    pub product: ProductSnapshot,
    pub quantity: i32,
}

/// Merges repeated product ids (summing quantities) while keeping the order
/// in which each product first appeared.
pub fn merge_lines(lines: &[CartLine]) -> Result<Vec<CartLine>, CheckoutError> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        match merged.iter_mut().find(|m| m.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    CheckoutError::InvalidCart(format!(
                        "quantity for product {} is too large",
                        line.product_id
                    ))
                })?;
            }
            None => merged.push(*line),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_repeated_products_in_first_seen_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = merge_lines(&[
            CartLine { product_id: a, quantity: 1 },
            CartLine { product_id: b, quantity: 2 },
            CartLine { product_id: a, quantity: 3 },
        ])
        .expect("merge failed");

        assert_eq!(
            merged,
            vec![
                CartLine { product_id: a, quantity: 4 },
                CartLine { product_id: b, quantity: 2 },
            ]
        );
    }

    #[test]
    fn merged_quantity_overflow_is_an_invalid_cart() {
        let a = Uuid::new_v4();
        let err = merge_lines(&[
            CartLine { product_id: a, quantity: i32::MAX },
            CartLine { product_id: a, quantity: 1 },
        ])
        .expect_err("overflow must be rejected");

        assert!(matches!(err, CheckoutError::InvalidCart(_)), "{err:?}");
    }
}
