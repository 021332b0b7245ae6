use crate::{
    dto::orders::{OrderList, OrderStatusOptions, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let items = state.orders.list().await?;
    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

/// Any status string is persisted as given; only the dashboard selector is
/// limited to [`OrderStatus::KNOWN`].
pub async fn update_order_status(
    state: &AppState,
    id: i64,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let status = OrderStatus::from(payload.status);
    if !status.is_known() {
        tracing::warn!(order_id = id, status = %status, "storing non-standard order status");
    }

    let order = state.orders.update_status(id, status).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    tracing::info!(order_id = order.id, status = %order.status, "order status updated");

    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}

pub fn order_statuses() -> ApiResponse<OrderStatusOptions> {
    let statuses = OrderStatus::KNOWN.iter().map(|s| s.to_string()).collect();
    ApiResponse::success("Order statuses", OrderStatusOptions { statuses }, None)
}
