use rust_decimal::Decimal;

use crate::{
    dto::admin::{Dashboard, DashboardMetrics},
    error::AppResult,
    models::{OrderListing, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn dashboard(state: &AppState) -> AppResult<ApiResponse<Dashboard>> {
    let products = state.catalog.list().await?;
    let orders = state.orders.list().await?;
    let metrics = metrics(&products, &orders);

    Ok(ApiResponse::success(
        "Dashboard",
        Dashboard {
            metrics,
            products,
            orders,
        },
        Some(Meta::empty()),
    ))
}

pub fn metrics(products: &[Product], orders: &[OrderListing]) -> DashboardMetrics {
    DashboardMetrics {
        total_orders: orders.len(),
        total_products: products.len(),
        total_revenue: orders
            .iter()
            .map(|listing| listing.order.total_price)
            .sum::<Decimal>(),
    }
}
