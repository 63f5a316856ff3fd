use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Every way a checkout can fail. Each variant maps to exactly one
/// [`CheckoutErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("payment reference is missing")]
    ReferenceMissing,

    #[error("payment gateway is misconfigured: {0}")]
    GatewayConfig(String),

    #[error("payment verification failed: {0}")]
    VerificationFailed(String),

    #[error("amount paid ({paid}) is less than the order total ({expected})")]
    AmountMismatch { expected: i64, paid: i64 },

    #[error("product {0} not found in catalog")]
    ProductNotFound(Uuid),

    #[error("invalid cart: {0}")]
    InvalidCart(String),

    #[error("payment reference already used for order {master_order_number}")]
    DuplicateSubmission { master_order_number: String },

    #[error("failed to persist orders: {0}")]
    Persistence(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutErrorKind {
    ReferenceMissing,
    GatewayConfigError,
    VerificationFailed,
    AmountMismatch,
    ProductNotFound,
    InvalidCart,
    DuplicateSubmission,
    PersistenceError,
}

impl CheckoutError {
    pub fn kind(&self) -> CheckoutErrorKind {
        match self {
            CheckoutError::ReferenceMissing => CheckoutErrorKind::ReferenceMissing,
            CheckoutError::GatewayConfig(_) => CheckoutErrorKind::GatewayConfigError,
            CheckoutError::VerificationFailed(_) => CheckoutErrorKind::VerificationFailed,
            CheckoutError::AmountMismatch { .. } => CheckoutErrorKind::AmountMismatch,
            CheckoutError::ProductNotFound(_) => CheckoutErrorKind::ProductNotFound,
            CheckoutError::InvalidCart(_) => CheckoutErrorKind::InvalidCart,
            CheckoutError::DuplicateSubmission { .. } => CheckoutErrorKind::DuplicateSubmission,
            CheckoutError::Persistence(_) => CheckoutErrorKind::PersistenceError,
        }
    }

    /// Text that can be shown to the buyer. Operator-facing details of
    /// configuration and storage failures stay out of it.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::GatewayConfig(_) => {
                "Payments are temporarily unavailable. Please try again later.".to_string()
            }
            CheckoutError::Persistence(_) => {
                "We could not place your order. Your cart has not been changed.".to_string()
            }
            CheckoutError::VerificationFailed(_) => {
                "Your payment could not be verified.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Failures that point at a deployment or infrastructure defect rather
    /// than something the buyer did.
    pub fn is_operator_facing(&self) -> bool {
        matches!(
            self,
            CheckoutError::GatewayConfig(_) | CheckoutError::Persistence(_)
        )
    }
}
