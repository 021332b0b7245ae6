use axum::body::Bytes;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    dto::products::{CatalogItem, CatalogList, CreateProductRequest, UpdateProductRequest, UploadedImage},
    error::{AppError, AppResult},
    models::{NewProduct, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

pub async fn list_catalog(state: &AppState) -> AppResult<ApiResponse<CatalogList>> {
    let items: Vec<CatalogItem> = state
        .catalog
        .list()
        .await?
        .into_iter()
        .map(CatalogItem::from)
        .collect();

    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success("Products", CatalogList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<CatalogItem>> {
    let result = state.catalog.get(id).await?;
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", CatalogItem::from(result), None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let new_product = NewProduct::from(payload);
    if new_product.name.is_empty() {
        return Err(AppError::Validation("Product name is required".into()));
    }
    ensure_non_negative("price", Some(new_product.price))?;
    ensure_non_negative("shipping_cost", new_product.shipping_cost)?;

    let product = state.catalog.create(new_product).await?;
    tracing::info!(product_id = product.id, name = %product.name, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(AppError::Validation("Product name is required".into()));
    }
    ensure_non_negative("price", payload.price)?;
    ensure_non_negative("shipping_cost", payload.shipping_cost)?;

    let product = state.catalog.update(id, payload.into()).await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    tracing::info!(product_id = id, "product updated");

    Ok(ApiResponse::success(
        "Updated",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if !state.catalog.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn upload_image(
    state: &AppState,
    original_name: &str,
    content_type: Option<&str>,
    bytes: Bytes,
) -> AppResult<ApiResponse<UploadedImage>> {
    if bytes.is_empty() {
        return Err(AppError::Validation("Image file is empty".into()));
    }

    let object_name = image_object_name(original_name);
    let path = state.images.upload(&object_name, content_type, bytes).await?;
    let url = state.images.public_url(&path);
    tracing::info!(object = %path, "product image uploaded");

    Ok(ApiResponse::success(
        "Image uploaded",
        UploadedImage { path, url },
        Some(Meta::empty()),
    ))
}

/// Random object name that keeps the upload's extension, `jpg` when it has
/// none.
pub fn image_object_name(original_name: &str) -> String {
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim())
        .filter(|ext| !ext.is_empty() && !ext.contains('/'))
        .unwrap_or(DEFAULT_IMAGE_EXTENSION);
    format!("{}.{}", Uuid::new_v4(), extension)
}

fn ensure_non_negative(field: &str, value: Option<Decimal>) -> AppResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO => {
            Err(AppError::Validation(format!("{field} must not be negative")))
        }
        _ => Ok(()),
    }
}
