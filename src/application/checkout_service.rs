use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;

use crate::domain::cart::{merge_lines, CartLine, CollectedLine};
use crate::domain::checkout::{
    CheckoutCommit, CheckoutReceipt, CheckoutRequest, CheckoutResult, CheckoutStage,
};
use crate::domain::errors::{CheckoutError, DomainError};
use crate::domain::payment::{normalize_reference, IdempotencyKey};
use crate::domain::ports::{
    CartStore, OrderLedger, OrderNumberSource, PaymentGateway, ProductCatalog,
};
use crate::domain::splitter::{cart_total, split_by_seller, SplitContext};

use super::buyer_locks::BuyerLocks;

/// Runs the checkout workflow: collect the cart, verify the payment, split
/// the cart per seller and persist every sub-order in one atomic commit.
///
/// The buyer's cart is read only while that buyer's lease is held, so two
/// overlapping submissions never see the same cart.
pub struct CheckoutService {
    catalog: Arc<dyn ProductCatalog>,
    carts: Arc<dyn CartStore>,
    ledger: Arc<dyn OrderLedger>,
    gateway: Arc<dyn PaymentGateway>,
    numbers: Arc<dyn OrderNumberSource>,
    locks: BuyerLocks,
}

fn storage_failure(e: DomainError) -> CheckoutError {
    CheckoutError::Persistence(e.to_string())
}

impl CheckoutService {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartStore>,
        ledger: Arc<dyn OrderLedger>,
        gateway: Arc<dyn PaymentGateway>,
        numbers: Arc<dyn OrderNumberSource>,
    ) -> Self {
        Self {
            catalog,
            carts,
            ledger,
            gateway,
            numbers,
            locks: BuyerLocks::new(),
        }
    }

    /// Never fails: every error is reported through [`CheckoutResult::Failed`].
    pub async fn checkout(&self, request: CheckoutRequest) -> CheckoutResult {
        let buyer_id = request.buyer_id;

        let lease = self.locks.acquire(buyer_id).await;
        let result = self.run(request).await;
        drop(lease);

        match &result {
            Ok(receipt) => log::info!(
                "Checkout for buyer {} placed {} with {} sub-order(s)",
                buyer_id,
                receipt.master_order_number,
                receipt.order_ids.len()
            ),
            Err(e) if e.is_operator_facing() => {
                log::error!("Checkout for buyer {} failed: {}", buyer_id, e)
            }
            Err(e) => log::warn!("Checkout for buyer {} rejected: {}", buyer_id, e),
        }

        CheckoutResult::from(result)
    }

    async fn run(&self, request: CheckoutRequest) -> Result<CheckoutReceipt, CheckoutError> {
        let buyer_id = request.buyer_id;
        let reference = normalize_reference(&request.payment_reference)?.to_string();
        let idempotency_key = IdempotencyKey::from_reference(&reference);

        if let Some(master_order_number) = self
            .ledger
            .find_submission(&idempotency_key)
            .await
            .map_err(storage_failure)?
        {
            return Err(CheckoutError::DuplicateSubmission {
                master_order_number,
            });
        }

        log::debug!("Checkout for buyer {}: {}", buyer_id, CheckoutStage::Collecting);
        let cart_lines = self
            .carts
            .cart_lines(buyer_id)
            .await
            .map_err(storage_failure)?;
        let lines = self.collect(&cart_lines).await?;
        let expected = cart_total(&lines)?;

        log::debug!("Checkout for buyer {}: {}", buyer_id, CheckoutStage::Verifying);
        let payment = self.gateway.verify(&reference).await?;
        payment.ensure_covers(expected)?;

        log::debug!("Checkout for buyer {}: {}", buyer_id, CheckoutStage::Splitting);
        let placed_at = Utc::now();
        let master_order_number = self.numbers.next_master_number(placed_at);
        let sub_orders = split_by_seller(
            &lines,
            &SplitContext {
                buyer_id,
                master_order_number: &master_order_number,
                payment_reference: &reference,
                shipping_address: &request.shipping_address,
                placed_at,
            },
        )?;
        let order_ids: Vec<String> = sub_orders.iter().map(|o| o.order_id.clone()).collect();

        log::debug!("Checkout for buyer {}: {}", buyer_id, CheckoutStage::Persisting);
        self.ledger
            .commit_checkout(CheckoutCommit {
                buyer_id,
                idempotency_key,
                master_order_number: master_order_number.clone(),
                sub_orders,
            })
            .await?;

        Ok(CheckoutReceipt {
            master_order_number,
            order_ids,
        })
    }

    /// Joins every cart line with the live catalog. Lookups run concurrently.
    async fn collect(&self, cart_lines: &[CartLine]) -> Result<Vec<CollectedLine>, CheckoutError> {
        if cart_lines.is_empty() {
            return Err(CheckoutError::InvalidCart("cart is empty".to_string()));
        }
        if let Some(line) = cart_lines.iter().find(|l| l.quantity < 1) {
            return Err(CheckoutError::InvalidCart(format!(
                "quantity for product {} must be at least 1",
                line.product_id
            )));
        }

        let lookups = merge_lines(cart_lines)?.into_iter().map(|line| async move {
            let product = self
                .catalog
                .find_product(line.product_id)
                .await
                .map_err(storage_failure)?
                .ok_or(CheckoutError::ProductNotFound(line.product_id))?;
            Ok::<_, CheckoutError>(CollectedLine {
                product,
                quantity: line.quantity,
            })
        });

        try_join_all(lookups).await
    }
}
