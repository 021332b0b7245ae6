use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DELIVERY_FEE, NewProduct, Product, ProductPatch};

/// Admin "add product" form. Empty numeric inputs fall back to the form
/// defaults: price 0, shipping the flat delivery fee, stock 0.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name.trim().to_string(),
            description: req.description,
            details: req.details,
            price: req.price.unwrap_or(Decimal::ZERO),
            shipping_cost: Some(req.shipping_cost.unwrap_or(DELIVERY_FEE)),
            stock: Some(req.stock.unwrap_or(0)),
            image_url: req.image_url.filter(|url| !url.is_empty()),
        }
    }
}

/// Partial update; absent fields keep their stored values.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub details: Option<String>,
    pub price: Option<Decimal>,
    pub shipping_cost: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(req: UpdateProductRequest) -> Self {
        ProductPatch {
            name: req.name,
            description: req.description,
            details: req.details,
            price: req.price,
            shipping_cost: req.shipping_cost,
            stock: req.stock,
            image_url: req.image_url,
        }
    }
}

/// A product as shown on the storefront.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub product: Product,
    pub stock_label: String,
    pub sold_out: bool,
    /// Shipping shown on the product card; the flat fee when unset.
    pub effective_shipping_cost: Decimal,
}

impl From<Product> for CatalogItem {
    fn from(product: Product) -> Self {
        Self {
            stock_label: product.stock_label(),
            sold_out: product.is_sold_out(),
            effective_shipping_cost: product.effective_shipping_cost(),
            product,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CatalogList {
    #[schema(value_type = Vec<CatalogItem>)]
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedImage {
    pub path: String,
    pub url: String,
}
