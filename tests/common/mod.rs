//! In-memory stand-ins for the service's ports.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use checkout_service::application::checkout_service::CheckoutService;
use checkout_service::domain::cart::{CartLine, ProductSnapshot};
use checkout_service::domain::checkout::CheckoutCommit;
use checkout_service::domain::errors::{CheckoutError, DomainError};
use checkout_service::domain::order::{
    page_offset, ListResult, OrderStatus, ShippingAddress, SubOrder,
};
use checkout_service::domain::payment::{IdempotencyKey, VerifiedPayment};
use checkout_service::domain::ports::{
    CartStore, OrderLedger, OrderNumberSource, PaymentGateway, ProductCatalog,
};
use checkout_service::AppState;

// ── Store ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub products: HashMap<Uuid, ProductSnapshot>,
    pub carts: HashMap<Uuid, Vec<CartLine>>,
    pub orders: HashMap<String, SubOrder>,
    pub seller_orders: HashMap<(Uuid, String), SubOrder>,
    pub submissions: HashMap<String, String>,
}

/// Catalog, cart store and ledgers sharing one state. A commit is applied to
/// a copy that replaces the state only when every write succeeded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    fail_after_writes: Mutex<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_product(
        &self,
        seller_id: Uuid,
        unit_price: i64,
        shipping_fee_per_unit: i64,
    ) -> Uuid {
        let product_id = Uuid::new_v4();
        self.put_product(ProductSnapshot {
            product_id,
            seller_id,
            name: format!("product-{unit_price}"),
            unit_price,
            shipping_fee_per_unit,
            image_url: None,
        });
        product_id
    }

    pub fn put_product(&self, product: ProductSnapshot) {
        self.state
            .lock()
            .unwrap()
            .products
            .insert(product.product_id, product);
    }

    pub fn remove_product(&self, product_id: Uuid) {
        self.state.lock().unwrap().products.remove(&product_id);
    }

    pub fn add_to_cart(&self, buyer_id: Uuid, product_id: Uuid, quantity: i32) {
        self.state
            .lock()
            .unwrap()
            .carts
            .entry(buyer_id)
            .or_default()
            .push(CartLine {
                product_id,
                quantity,
            });
    }

    pub fn cart(&self, buyer_id: Uuid) -> Vec<CartLine> {
        self.state
            .lock()
            .unwrap()
            .carts
            .get(&buyer_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().unwrap().clone()
    }

    /// The next commit fails once `writes` ledger rows have been staged.
    pub fn fail_commit_after(&self, writes: usize) {
        *self.fail_after_writes.lock().unwrap() = Some(writes);
    }
}

#[async_trait]
impl ProductCatalog for MemoryStore {
    async fn find_product(&self, product_id: Uuid) -> Result<Option<ProductSnapshot>, DomainError> {
        Ok(self.state.lock().unwrap().products.get(&product_id).cloned())
    }
}

#[async_trait]
impl CartStore for MemoryStore {
    async fn cart_lines(&self, buyer_id: Uuid) -> Result<Vec<CartLine>, DomainError> {
        Ok(self.cart(buyer_id))
    }

    async fn set_quantity(&self, buyer_id: Uuid, line: CartLine) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        let cart = state.carts.entry(buyer_id).or_default();
        match cart.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity = line.quantity,
            None => cart.push(line),
        }
        Ok(())
    }

    async fn remove_line(&self, buyer_id: Uuid, product_id: Uuid) -> Result<bool, DomainError> {
        let mut state = self.state.lock().unwrap();
        let Some(cart) = state.carts.get_mut(&buyer_id) else {
            return Ok(false);
        };
        let before = cart.len();
        cart.retain(|l| l.product_id != product_id);
        Ok(cart.len() < before)
    }
}

fn page_of(mut orders: Vec<SubOrder>, page: i64, limit: i64) -> Result<ListResult, DomainError> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let total = orders.len() as i64;
    let skip = page_offset(page, limit)? as usize;
    Ok(ListResult {
        items: orders.into_iter().skip(skip).take(limit as usize).collect(),
        total,
    })
}

#[async_trait]
impl OrderLedger for MemoryStore {
    async fn find_submission(&self, key: &IdempotencyKey) -> Result<Option<String>, DomainError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .submissions
            .get(key.as_str())
            .cloned())
    }

    async fn commit_checkout(&self, commit: CheckoutCommit) -> Result<(), CheckoutError> {
        let mut state = self.state.lock().unwrap();
        let fail_after = self.fail_after_writes.lock().unwrap().take();

        if let Some(master) = state.submissions.get(commit.idempotency_key.as_str()) {
            return Err(CheckoutError::DuplicateSubmission {
                master_order_number: master.clone(),
            });
        }

        let mut staged = state.clone();
        let mut writes = 0usize;
        let write = |writes: &mut usize| -> Result<(), CheckoutError> {
            if fail_after == Some(*writes) {
                return Err(CheckoutError::Persistence("injected write failure".to_string()));
            }
            *writes += 1;
            Ok(())
        };

        staged.submissions.insert(
            commit.idempotency_key.as_str().to_string(),
            commit.master_order_number.clone(),
        );
        for order in &commit.sub_orders {
            write(&mut writes)?;
            staged.orders.insert(order.order_id.clone(), order.clone());
            write(&mut writes)?;
            staged
                .seller_orders
                .insert((order.seller_id, order.order_id.clone()), order.clone());
        }
        write(&mut writes)?;
        staged.carts.remove(&commit.buyer_id);

        *state = staged;
        Ok(())
    }

    async fn find_order(&self, order_id: &str) -> Result<Option<SubOrder>, DomainError> {
        Ok(self.state.lock().unwrap().orders.get(order_id).cloned())
    }

    async fn list_seller_orders(
        &self,
        seller_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let orders = self
            .state
            .lock()
            .unwrap()
            .seller_orders
            .iter()
            .filter(|((seller, _), _)| *seller == seller_id)
            .map(|(_, order)| order.clone())
            .collect();
        page_of(orders, page, limit)
    }

    async fn list_buyer_orders(
        &self,
        buyer_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let orders = self
            .state
            .lock()
            .unwrap()
            .orders
            .values()
            .filter(|o| o.buyer_id == buyer_id)
            .cloned()
            .collect();
        page_of(orders, page, limit)
    }

    async fn update_status(
        &self,
        order_id: &str,
        next: OrderStatus,
    ) -> Result<SubOrder, DomainError> {
        let mut state = self.state.lock().unwrap();
        let order = state
            .orders
            .get_mut(order_id)
            .ok_or_else(|| DomainError::NotFound(format!("order {order_id}")))?;
        order.status = order.status.transition_to(next)?;
        let updated = order.clone();
        state
            .seller_orders
            .insert((updated.seller_id, updated.order_id.clone()), updated.clone());
        Ok(updated)
    }
}

// ── Gateway ───────────────────────────────────────────────────────────────────

/// Answers from a fixed table of references; unknown references fail.
#[derive(Debug, Default)]
pub struct FakeGateway {
    answers: Mutex<HashMap<String, Result<VerifiedPayment, CheckoutError>>>,
    calls: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl FakeGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn paid(&self, reference: &str, amount: i64) {
        self.answers.lock().unwrap().insert(
            reference.to_string(),
            Ok(VerifiedPayment {
                reference: reference.to_string(),
                gateway_status: "success".to_string(),
                amount_paid_minor_units: amount,
            }),
        );
    }

    pub fn fails_with(&self, reference: &str, error: CheckoutError) {
        self.answers
            .lock()
            .unwrap()
            .insert(reference.to_string(), Err(error));
    }

    pub fn slow(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn verify(&self, reference: &str) -> Result<VerifiedPayment, CheckoutError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .unwrap_or_else(|| {
                Err(CheckoutError::VerificationFailed(format!(
                    "unknown reference {reference}"
                )))
            })
    }
}

// ── Order numbers ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SequentialNumbers {
    next: AtomicUsize,
}

impl OrderNumberSource for SequentialNumbers {
    fn next_master_number(&self, _placed_at: DateTime<Utc>) -> String {
        format!("ORD-TEST-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<FakeGateway>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            gateway: FakeGateway::new(),
        }
    }

    pub fn checkout_service(&self) -> CheckoutService {
        CheckoutService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.gateway.clone(),
            Arc::new(SequentialNumbers::default()),
        )
    }

    pub fn app_state(&self) -> AppState {
        AppState::from_parts(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.gateway.clone(),
            Arc::new(SequentialNumbers::default()),
        )
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ada Obi".to_string(),
        line1: "12 Market Road".to_string(),
        line2: None,
        city: "Lagos".to_string(),
        region: Some("LA".to_string()),
        postal_code: "100001".to_string(),
        country: "NG".to_string(),
        phone: Some("+2348000000000".to_string()),
    }
}
