use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::order::{ListResult, OrderLineItem, OrderStatus, ShippingAddress, SubOrder};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: Uuid,
    pub name: String,
    /// Minor currency units, as charged at checkout.
    pub unit_price: i64,
    pub quantity: i32,
    pub image_url: Option<String>,
}

impl From<OrderLineItem> for OrderItemResponse {
    fn from(item: OrderLineItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: item.quantity,
            image_url: item.image_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub order_id: String,
    pub master_order_number: String,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub tax_amount: i64,
    pub grand_total: i64,
    pub payment_reference: String,
    pub shipping_address: ShippingAddress,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<SubOrder> for OrderResponse {
    fn from(order: SubOrder) -> Self {
        Self {
            order_id: order.order_id,
            master_order_number: order.master_order_number,
            seller_id: order.seller_id,
            buyer_id: order.buyer_id,
            status: order.status,
            subtotal: order.subtotal,
            shipping_fee: order.shipping_fee,
            tax_amount: order.tax_amount,
            grand_total: order.grand_total,
            payment_reference: order.payment_reference,
            shipping_address: order.shipping_address,
            created_at: order.created_at.to_rfc3339(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl ListOrdersParams {
    fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl ListOrdersResponse {
    fn new(result: ListResult, page: i64, limit: i64) -> Self {
        Self {
            items: result.items.into_iter().map(OrderResponse::from).collect(),
            total: result.total,
            page,
            limit,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders/{order_id}
///
/// Returns a sub-order from the global ledger together with its items.
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(
        ("order_id" = String, Path, description = "Sub-order id, e.g. ORD-20261019083005000-a1b2c3-1"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = state.orders.get_order(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PATCH /orders/{order_id}/status
///
/// Moves a sub-order along PENDING → SHIPPED → FULFILLED (or to CANCELLED
/// before fulfillment). Both ledger copies change together.
#[utoipa::path(
    patch,
    path = "/orders/{order_id}/status",
    params(
        ("order_id" = String, Path, description = "Sub-order id"),
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order = state
        .orders
        .update_status(&path.into_inner(), body.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// GET /sellers/{seller_id}/orders
///
/// Paginated view of the seller-scoped ledger, newest first.
#[utoipa::path(
    get,
    path = "/sellers/{seller_id}/orders",
    params(
        ("seller_id" = Uuid, Path, description = "Seller UUID"),
        ListOrdersParams,
    ),
    responses(
        (status = 200, description = "Paginated list of the seller's orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_seller_orders(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();
    let result = state
        .orders
        .list_seller_orders(path.into_inner(), page, limit)
        .await?;
    Ok(HttpResponse::Ok().json(ListOrdersResponse::new(result, page, limit)))
}

/// GET /buyers/{buyer_id}/orders
///
/// Paginated list of a buyer's sub-orders (without their items).
#[utoipa::path(
    get,
    path = "/buyers/{buyer_id}/orders",
    params(
        ("buyer_id" = Uuid, Path, description = "Buyer UUID"),
        ListOrdersParams,
    ),
    responses(
        (status = 200, description = "Paginated list of the buyer's orders", body = ListOrdersResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_buyer_orders(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();
    let result = state
        .orders
        .list_buyer_orders(path.into_inner(), page, limit)
        .await?;
    Ok(HttpResponse::Ok().json(ListOrdersResponse::new(result, page, limit)))
}
