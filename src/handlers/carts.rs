use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::CartLine;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub buyer_id: Uuid,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuantityRequest {
    pub quantity: i32,
}

/// GET /buyers/{buyer_id}/cart
#[utoipa::path(
    get,
    path = "/buyers/{buyer_id}/cart",
    params(("buyer_id" = Uuid, Path, description = "Buyer UUID")),
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn view_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let buyer_id = path.into_inner();
    let lines = state.carts.view_cart(buyer_id).await?;
    Ok(HttpResponse::Ok().json(CartResponse { buyer_id, lines }))
}

/// PUT /buyers/{buyer_id}/cart/{product_id}
///
/// Adds the product to the cart or replaces its quantity.
#[utoipa::path(
    put,
    path = "/buyers/{buyer_id}/cart/{product_id}",
    params(
        ("buyer_id" = Uuid, Path, description = "Buyer UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = SetQuantityRequest,
    responses(
        (status = 200, description = "Line stored", body = CartLine),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Product not in catalog"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn set_quantity(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<SetQuantityRequest>,
) -> Result<HttpResponse, AppError> {
    let (buyer_id, product_id) = path.into_inner();
    let line = state
        .carts
        .set_quantity(buyer_id, product_id, body.quantity)
        .await?;
    Ok(HttpResponse::Ok().json(line))
}

/// DELETE /buyers/{buyer_id}/cart/{product_id}
#[utoipa::path(
    delete,
    path = "/buyers/{buyer_id}/cart/{product_id}",
    params(
        ("buyer_id" = Uuid, Path, description = "Buyer UUID"),
        ("product_id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "Product not in the cart"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "cart"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
    let (buyer_id, product_id) = path.into_inner();
    state.carts.remove_item(buyer_id, product_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
