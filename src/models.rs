use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Flat delivery fee charged once per checkout, in KWD.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Role marker a credential record must carry to open the dashboard.
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Decimal,
    pub shipping_cost: Option<Decimal>,
    pub image_url: Option<String>,
    /// `None` means the product is not stock-tracked and always available.
    pub stock: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn effective_shipping_cost(&self) -> Decimal {
        self.shipping_cost.unwrap_or(DELIVERY_FEE)
    }

    pub fn is_sold_out(&self) -> bool {
        self.stock.is_some_and(|stock| stock <= 0)
    }

    pub fn stock_label(&self) -> String {
        match self.stock {
            None => "In stock".to_string(),
            Some(stock) if stock > 10 => "In stock".to_string(),
            Some(stock) if stock > 0 => format!("{stock} left"),
            Some(_) => "Out of stock".to_string(),
        }
    }
}

/// Insert payload for the catalog table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Decimal,
    pub shipping_cost: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

/// Order status. The five named values are what the dashboard offers;
/// anything else the store holds is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    New,
    Processing,
    Shipped,
    Completed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub const KNOWN: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, OrderStatus::Other(_))
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "new" => OrderStatus::New,
            "processing" => OrderStatus::Processing,
            "shipped" => OrderStatus::Shipped,
            "completed" => OrderStatus::Completed,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        OrderStatus::from(raw.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub product_id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub customer_address: String,
    pub quantity: i32,
    pub total_price: Decimal,
    #[schema(value_type = String)]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// An order row joined with the name of the product it references.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderListing {
    #[serde(flatten)]
    pub order: Order,
    pub product_name: String,
}

pub const UNKNOWN_PRODUCT: &str = "Unknown";

impl OrderListing {
    pub fn new(order: Order, product_name: Option<String>) -> Self {
        Self {
            order,
            product_name: product_name.unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        }
    }
}

/// Insert payload for the orders table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub product_id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub customer_address: String,
    pub quantity: i32,
    pub total_price: Decimal,
    /// Defaults to [`OrderStatus::New`] when left unset.
    pub status: Option<OrderStatus>,
}

/// A credentials-table record. Never serialized.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
