//! Partitioning of a collected cart into one sub-order per seller.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::cart::CollectedLine;
use super::errors::CheckoutError;
use super::order::{OrderLineItem, OrderStatus, ShippingAddress, SubOrder};

/// Tax is not computed by this service.
pub const TAX_AMOUNT: i64 = 0;

/// Inputs shared by every sub-order of one checkout.
#[derive(Debug, Clone, Copy)]
pub struct SplitContext<'a> {
    pub buyer_id: Uuid,
    pub master_order_number: &'a str,
    pub payment_reference: &'a str,
    pub shipping_address: &'a ShippingAddress,
    pub placed_at: DateTime<Utc>,
}

/// `(unit_price * quantity, shipping_fee_per_unit * quantity)` for one line.
fn line_amounts(line: &CollectedLine) -> Result<(i64, i64), CheckoutError> {
    let quantity = i64::from(line.quantity);
    let goods = line.product.unit_price.checked_mul(quantity);
    let shipping = line.product.shipping_fee_per_unit.checked_mul(quantity);
    match (goods, shipping) {
        (Some(goods), Some(shipping)) => Ok((goods, shipping)),
        _ => Err(overflow()),
    }
}

fn overflow() -> CheckoutError {
    CheckoutError::InvalidCart("order total is too large".to_string())
}

/// Amount the buyer must have paid for the whole cart, across all sellers.
pub fn cart_total(lines: &[CollectedLine]) -> Result<i64, CheckoutError> {
    lines.iter().try_fold(0i64, |total, line| {
        let (goods, shipping) = line_amounts(line)?;
        total
            .checked_add(goods)
            .and_then(|t| t.checked_add(shipping))
            .ok_or_else(overflow)
    })
}

/// Groups lines by seller (first-appearance order) and prices each group.
/// Order ids are `{master}-{n}` with `n` starting at 1.
pub fn split_by_seller(
    lines: &[CollectedLine],
    ctx: &SplitContext<'_>,
) -> Result<Vec<SubOrder>, CheckoutError> {
    let mut groups: Vec<(Uuid, Vec<&CollectedLine>)> = Vec::new();
    for line in lines {
        let seller_id = line.product.seller_id;
        match groups.iter_mut().find(|(seller, _)| *seller == seller_id) {
            Some((_, group)) => group.push(line),
            None => groups.push((seller_id, vec![line])),
        }
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(index, (seller_id, group))| {
            let mut subtotal = 0i64;
            let mut shipping_fee = 0i64;
            let mut items = Vec::with_capacity(group.len());

            for line in group {
                let (goods, shipping) = line_amounts(line)?;
                subtotal = subtotal.checked_add(goods).ok_or_else(overflow)?;
                shipping_fee = shipping_fee.checked_add(shipping).ok_or_else(overflow)?;
                items.push(OrderLineItem {
                    product_id: line.product.product_id,
                    name: line.product.name.clone(),
                    unit_price: line.product.unit_price,
                    quantity: line.quantity,
                    image_url: line.product.image_url.clone(),
                });
            }

            let grand_total = subtotal
                .checked_add(shipping_fee)
                .and_then(|t| t.checked_add(TAX_AMOUNT))
                .ok_or_else(overflow)?;

            Ok(SubOrder {
                order_id: format!("{}-{}", ctx.master_order_number, index + 1),
                master_order_number: ctx.master_order_number.to_string(),
                seller_id,
                buyer_id: ctx.buyer_id,
                items,
                subtotal,
                shipping_fee,
                tax_amount: TAX_AMOUNT,
                grand_total,
                status: OrderStatus::Pending,
                payment_reference: ctx.payment_reference.to_string(),
                shipping_address: ctx.shipping_address.clone(),
                created_at: ctx.placed_at,
            })
        })
        .collect()
}
