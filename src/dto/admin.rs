use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{OrderListing, Product};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub total_orders: usize,
    pub total_products: usize,
    /// Sum of `total_price` over every order, whatever its status.
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub metrics: DashboardMetrics,
    pub products: Vec<Product>,
    pub orders: Vec<OrderListing>,
}
