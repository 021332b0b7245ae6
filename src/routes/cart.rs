use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    cart::CartSummary,
    dto::{
        cart::{AddToCartRequest, OpenCartResponse, UpdateQuantityRequest},
        orders::{CheckoutReceipt, CheckoutRequest},
    },
    error::AppResult,
    response::ApiResponse,
    services::{cart_service, checkout_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(open_cart))
        .route("/{cart_id}", get(get_cart).delete(clear_cart))
        .route("/{cart_id}/items", post(add_to_cart))
        .route(
            "/{cart_id}/items/{product_id}",
            patch(update_quantity).delete(remove_from_cart),
        )
        .route("/{cart_id}/checkout", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 201, description = "Open an empty cart for this visitor", body = ApiResponse<OpenCartResponse>)
    ),
    tag = "Cart"
)]
pub async fn open_cart(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<OpenCartResponse>>) {
    let resp = cart_service::open_cart(&state).await;
    (StatusCode::CREATED, Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/carts/{cart_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Cart items and totals", body = ApiResponse<CartSummary>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::get_cart(&state, cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}/items",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID")
    ),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Product added, or its quantity bumped by one", body = ApiResponse<CartSummary>),
        (status = 400, description = "Product is sold out"),
        (status = 404, description = "Cart or product not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::add_to_cart(&state, cart_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/carts/{cart_id}/items/{product_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID"),
        ("product_id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity set; below 1 removes the item", body = ApiResponse<CartSummary>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, i64)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::update_quantity(&state, cart_id, product_id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}/items/{product_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID"),
        ("product_id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartSummary>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, i64)>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::remove_from_cart(&state, cart_id, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{cart_id}",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID")
    ),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartSummary>),
        (status = 404, description = "Cart not found"),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartSummary>>> {
    let resp = cart_service::clear_cart(&state, cart_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{cart_id}/checkout",
    params(
        ("cart_id" = Uuid, Path, description = "Cart ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "One order per line item submitted; cart cleared", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Empty cart or missing customer details"),
        (status = 404, description = "Cart not found"),
        (status = 502, description = "An order failed; earlier orders stay submitted and the cart is kept"),
    ),
    tag = "Cart"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = checkout_service::checkout(&state, cart_id, payload).await?;
    Ok(Json(resp))
}
