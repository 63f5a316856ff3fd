use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Serializes checkout attempts per buyer. Different buyers never contend.
#[derive(Debug, Clone, Default)]
pub struct BuyerLocks {
    inner: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BuyerLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other checkout for `buyer_id` is running. The entry is
    /// pruned when the returned lease is dropped, even if the checkout future
    /// holding it is abandoned.
    pub async fn acquire(&self, buyer_id: Uuid) -> BuyerLease {
        let lock = self.inner.entry(buyer_id).or_default().clone();
        let guard = lock.lock_owned().await;
        BuyerLease {
            guard: Some(guard),
            locks: self.clone(),
            buyer_id,
        }
    }

    /// Drops the entry for `buyer_id` once nobody holds or waits on it.
    pub fn release(&self, buyer_id: Uuid) {
        self.inner
            .remove_if(&buyer_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    pub fn tracked(&self) -> usize {
        self.inner.len()
    }
}

/// Exclusive hold on one buyer's checkout slot.
#[derive(Debug)]
pub struct BuyerLease {
    guard: Option<OwnedMutexGuard<()>>,
    locks: BuyerLocks,
    buyer_id: Uuid,
}

impl Drop for BuyerLease {
    fn drop(&mut self) {
        // The guard owns a reference to the mutex; let go of it first.
        self.guard.take();
        self.locks.release(self.buyer_id);
    }
}
