use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::checkout::{CheckoutFailure, CheckoutRequest, CheckoutResult};
use crate::domain::errors::{CheckoutError, CheckoutErrorKind};
use crate::domain::order::ShippingAddress;
use crate::errors::checkout_failure_status;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequestBody {
    pub buyer_id: Uuid,
    pub shipping_address: ShippingAddress,
    /// Reference returned by the payment gateway when the buyer paid.
    #[serde(default)]
    pub payment_reference: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutSuccessResponse {
    pub success: bool,
    pub master_order_number: String,
    pub order_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutFailureResponse {
    pub success: bool,
    pub error_kind: CheckoutErrorKind,
    /// Safe to show to the buyer.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_order_number: Option<String>,
}

impl From<CheckoutFailure> for CheckoutFailureResponse {
    fn from(failure: CheckoutFailure) -> Self {
        let mut response = Self {
            success: false,
            error_kind: failure.kind,
            message: failure.message,
            product_id: None,
            expected_amount: None,
            paid_amount: None,
            master_order_number: None,
        };
        match failure.error {
            CheckoutError::ProductNotFound(product_id) => response.product_id = Some(product_id),
            CheckoutError::AmountMismatch { expected, paid } => {
                response.expected_amount = Some(expected);
                response.paid_amount = Some(paid);
            }
            CheckoutError::DuplicateSubmission {
                master_order_number,
            } => response.master_order_number = Some(master_order_number),
            _ => {}
        }
        response
    }
}

pub fn checkout_response(result: CheckoutResult) -> HttpResponse {
    match result {
        CheckoutResult::Succeeded(receipt) => {
            HttpResponse::Created().json(CheckoutSuccessResponse {
                success: true,
                master_order_number: receipt.master_order_number,
                order_ids: receipt.order_ids,
            })
        }
        CheckoutResult::Failed(failure) => {
            HttpResponse::build(checkout_failure_status(failure.kind))
                .json(CheckoutFailureResponse::from(failure))
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /checkout
///
/// Turns the buyer's stored cart into one order per seller once the payment
/// reference is verified. Prices always come from the catalog. The cart is
/// emptied in the same transaction that records the orders.
#[utoipa::path(
    post,
    path = "/checkout",
    request_body = CheckoutRequestBody,
    responses(
        (status = 201, description = "Orders placed", body = CheckoutSuccessResponse),
        (status = 400, description = "Missing payment reference or invalid cart", body = CheckoutFailureResponse),
        (status = 402, description = "Payment not verified or insufficient", body = CheckoutFailureResponse),
        (status = 409, description = "Payment reference already used", body = CheckoutFailureResponse),
        (status = 422, description = "A cart product no longer exists", body = CheckoutFailureResponse),
        (status = 500, description = "Gateway misconfiguration or storage failure", body = CheckoutFailureResponse),
    ),
    tag = "checkout"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<CheckoutRequestBody>,
) -> HttpResponse {
    let body = body.into_inner();

    let result = state
        .checkout
        .checkout(CheckoutRequest {
            buyer_id: body.buyer_id,
            shipping_address: body.shipping_address,
            payment_reference: body.payment_reference,
        })
        .await;

    checkout_response(result)
}
