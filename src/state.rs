use std::sync::Arc;

use crate::application::cart_service::CartService;
use crate::application::checkout_service::CheckoutService;
use crate::application::order_service::OrderService;
use crate::db::DbPool;
use crate::domain::ports::{
    CartStore, OrderLedger, OrderNumberSource, PaymentGateway, ProductCatalog,
};
use crate::infrastructure::cart_repo::DieselCartStore;
use crate::infrastructure::catalog_repo::DieselProductCatalog;
use crate::infrastructure::order_numbers::TimestampOrderNumbers;
use crate::infrastructure::order_repo::DieselOrderLedger;

/// Services shared by every worker. Built once at startup and handed to the
/// server; nothing in the crate reaches for a global client.
pub struct AppState {
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub carts: CartService,
}

impl AppState {
    /// Wires the Postgres adapters around `gateway`.
    pub fn new(pool: DbPool, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::from_parts(
            Arc::new(DieselProductCatalog::new(pool.clone())),
            Arc::new(DieselCartStore::new(pool.clone())),
            Arc::new(DieselOrderLedger::new(pool)),
            gateway,
            Arc::new(TimestampOrderNumbers),
        )
    }

    pub fn from_parts(
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartStore>,
        ledger: Arc<dyn OrderLedger>,
        gateway: Arc<dyn PaymentGateway>,
        numbers: Arc<dyn OrderNumberSource>,
    ) -> Self {
        Self {
            checkout: CheckoutService::new(
                catalog.clone(),
                carts.clone(),
                ledger.clone(),
                gateway,
                numbers,
            ),
            orders: OrderService::new(ledger),
            carts: CartService::new(carts, catalog),
        }
    }
}
