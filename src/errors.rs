use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{CheckoutErrorKind, DomainError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(what) => AppError::NotFound(what),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Internal(msg) => {
                log::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "error": self.to_string()
            })),
        }
    }
}

/// HTTP status for a failed checkout, chosen so clients can branch on it
/// (retry payment, fix cart, contact support).
pub fn checkout_failure_status(kind: CheckoutErrorKind) -> StatusCode {
    match kind {
        CheckoutErrorKind::ReferenceMissing | CheckoutErrorKind::InvalidCart => {
            StatusCode::BAD_REQUEST
        }
        CheckoutErrorKind::VerificationFailed | CheckoutErrorKind::AmountMismatch => {
            StatusCode::PAYMENT_REQUIRED
        }
        CheckoutErrorKind::DuplicateSubmission => StatusCode::CONFLICT,
        CheckoutErrorKind::ProductNotFound => StatusCode::UNPROCESSABLE_ENTITY,
        CheckoutErrorKind::GatewayConfigError | CheckoutErrorKind::PersistenceError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
