//! Thin clients over the hosted backend: relational tables for products,
//! orders and credentials, plus the product-image bucket.
//!
//! Every call returns a [`GatewayResult`]; failures carry the backend's own
//! message so it can be shown to the user as-is.

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

use crate::models::{
    AdminCredential, NewOrder, NewProduct, Order, OrderListing, OrderStatus, Product,
    ProductPatch,
};

pub mod catalog;
pub mod credentials;
pub mod orders;
pub mod storage;

pub use catalog::SeaOrmCatalog;
pub use credentials::SeaOrmCredentials;
pub use orders::SeaOrmOrders;
pub use storage::HttpObjectStorage;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GatewayError {
    message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<sea_orm::DbErr> for GatewayError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::new(err.to_string())
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// An update whose row disappeared after it was read comes back as `None`.
pub(crate) fn missing_if_not_updated<T>(
    result: Result<T, sea_orm::DbErr>,
) -> Result<Option<T>, sea_orm::DbErr> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(sea_orm::DbErr::RecordNotUpdated) => Ok(None),
        Err(err) => Err(err),
    }
}

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// All products, newest first.
    async fn list(&self) -> GatewayResult<Vec<Product>>;

    async fn get(&self, id: i64) -> GatewayResult<Option<Product>>;

    async fn create(&self, product: NewProduct) -> GatewayResult<Product>;

    /// Writes only the fields set in `patch`. `None` when no row has `id`.
    async fn update(&self, id: i64, patch: ProductPatch) -> GatewayResult<Option<Product>>;

    /// `false` when no row has `id`.
    async fn delete(&self, id: i64) -> GatewayResult<bool>;
}

#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit(&self, order: NewOrder) -> GatewayResult<Order>;

    /// All orders, newest first, each with its product name (or "Unknown").
    async fn list(&self) -> GatewayResult<Vec<OrderListing>>;

    /// Persists `status` verbatim. `None` when no row has `id`.
    async fn update_status(&self, id: i64, status: OrderStatus) -> GatewayResult<Option<Order>>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active credential records whose email matches exactly, any role.
    async fn find_active_by_email(&self, email: &str) -> GatewayResult<Vec<AdminCredential>>;
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Stores `bytes` under `object_name` without overwriting an existing
    /// object. Returns the stored object path.
    async fn upload(
        &self,
        object_name: &str,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> GatewayResult<String>;

    fn public_url(&self, object_path: &str) -> String;
}
