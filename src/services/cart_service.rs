use uuid::Uuid;

use crate::{
    cart::{CartSummary, SharedCart},
    dto::cart::{AddToCartRequest, OpenCartResponse, UpdateQuantityRequest},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub(crate) async fn find_cart(state: &AppState, cart_id: Uuid) -> AppResult<SharedCart> {
    state.carts.get(cart_id).await.ok_or(AppError::NotFound)
}

pub async fn open_cart(state: &AppState) -> ApiResponse<OpenCartResponse> {
    let cart_id = state.carts.open().await;
    tracing::debug!(%cart_id, "cart opened");
    ApiResponse::success("Cart opened", OpenCartResponse { cart_id }, Some(Meta::empty()))
}

pub async fn get_cart(state: &AppState, cart_id: Uuid) -> AppResult<ApiResponse<CartSummary>> {
    let cart = find_cart(state, cart_id).await?;
    let summary = cart.lock().await.summary(cart_id);
    let meta = Meta::new(summary.items.len() as i64);
    Ok(ApiResponse::success("OK", summary, Some(meta)))
}

pub async fn add_to_cart(
    state: &AppState,
    cart_id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartSummary>> {
    let cart = find_cart(state, cart_id).await?;

    let product = state.catalog.get(payload.product_id).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    if product.is_sold_out() {
        return Err(AppError::Validation("This product is sold out".into()));
    }

    let mut cart = cart.lock().await;
    cart.add(product);
    Ok(ApiResponse::success("Added to cart", cart.summary(cart_id), None))
}

pub async fn update_quantity(
    state: &AppState,
    cart_id: Uuid,
    product_id: i64,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartSummary>> {
    let cart = find_cart(state, cart_id).await?;
    let mut cart = cart.lock().await;
    cart.update_quantity(product_id, payload.quantity);
    Ok(ApiResponse::success("Cart updated", cart.summary(cart_id), None))
}

pub async fn remove_from_cart(
    state: &AppState,
    cart_id: Uuid,
    product_id: i64,
) -> AppResult<ApiResponse<CartSummary>> {
    let cart = find_cart(state, cart_id).await?;
    let mut cart = cart.lock().await;
    cart.remove(product_id);
    Ok(ApiResponse::success("Removed from cart", cart.summary(cart_id), None))
}

pub async fn clear_cart(state: &AppState, cart_id: Uuid) -> AppResult<ApiResponse<CartSummary>> {
    let cart = find_cart(state, cart_id).await?;
    let mut cart = cart.lock().await;
    cart.clear();
    Ok(ApiResponse::success("Cart cleared", cart.summary(cart_id), None))
}
