use std::fmt;

use serde::Serialize;
use uuid::Uuid;

use super::errors::{CheckoutError, CheckoutErrorKind};
use super::order::{ShippingAddress, SubOrder};
use super::payment::IdempotencyKey;

/// One checkout submission. The cart itself is read from the buyer's stored
/// cart once the submission holds the buyer's lease.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub buyer_id: Uuid,
    pub shipping_address: ShippingAddress,
    pub payment_reference: String,
}

/// Everything the persister writes in one atomic unit.
#[derive(Debug, Clone)]
pub struct CheckoutCommit {
    pub buyer_id: Uuid,
    pub idempotency_key: IdempotencyKey,
    pub master_order_number: String,
    pub sub_orders: Vec<SubOrder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    Collecting,
    Verifying,
    Splitting,
    Persisting,
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStage::Collecting => "collecting",
            CheckoutStage::Verifying => "verifying",
            CheckoutStage::Splitting => "splitting",
            CheckoutStage::Persisting => "persisting",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
    pub master_order_number: String,
    pub order_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutFailure {
    pub kind: CheckoutErrorKind,
    pub message: String,
    pub error: CheckoutError,
}

/// Terminal state of one checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutResult {
    Succeeded(CheckoutReceipt),
    Failed(CheckoutFailure),
}

impl CheckoutResult {
    pub fn failed(error: CheckoutError) -> Self {
        CheckoutResult::Failed(CheckoutFailure {
            kind: error.kind(),
            message: error.user_message(),
            error,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckoutResult::Succeeded(_))
    }

    pub fn error_kind(&self) -> Option<CheckoutErrorKind> {
        match self {
            CheckoutResult::Succeeded(_) => None,
            CheckoutResult::Failed(failure) => Some(failure.kind),
        }
    }
}

impl From<Result<CheckoutReceipt, CheckoutError>> for CheckoutResult {
    fn from(result: Result<CheckoutReceipt, CheckoutError>) -> Self {
        match result {
            Ok(receipt) => CheckoutResult::Succeeded(receipt),
            Err(error) => CheckoutResult::failed(error),
        }
    }
}
