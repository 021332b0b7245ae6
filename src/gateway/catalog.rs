use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::{
    db::OrmConn,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    gateway::{CatalogGateway, GatewayResult, missing_if_not_updated},
    models::{NewProduct, Product, ProductPatch},
};

/// Catalog gateway over the backend's `products` table.
#[derive(Clone)]
pub struct SeaOrmCatalog {
    orm: OrmConn,
}

impl SeaOrmCatalog {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CatalogGateway for SeaOrmCatalog {
    async fn list(&self) -> GatewayResult<Vec<Product>> {
        let items = Products::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to fetch products"))?
            .into_iter()
            .map(product_from_entity)
            .collect();
        Ok(items)
    }

    async fn get(&self, id: i64) -> GatewayResult<Option<Product>> {
        let product = Products::find_by_id(id)
            .one(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, product_id = id, "failed to fetch product"))?
            .map(product_from_entity);
        Ok(product)
    }

    async fn create(&self, product: NewProduct) -> GatewayResult<Product> {
        let active = ActiveModel {
            id: NotSet,
            name: Set(product.name),
            description: Set(product.description),
            details: Set(product.details),
            price: Set(Some(product.price)),
            shipping_cost: Set(product.shipping_cost),
            image_url: Set(product.image_url),
            stock: Set(product.stock),
            created_at: NotSet,
        };
        let model = active
            .insert(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to add product"))?;
        Ok(product_from_entity(model))
    }

    async fn update(&self, id: i64, patch: ProductPatch) -> GatewayResult<Option<Product>> {
        let existing = Products::find_by_id(id).one(&self.orm).await?;
        let existing = match existing {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active: ActiveModel = existing.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(details) = patch.details {
            active.details = Set(Some(details));
        }
        if let Some(price) = patch.price {
            active.price = Set(Some(price));
        }
        if let Some(shipping_cost) = patch.shipping_cost {
            active.shipping_cost = Set(Some(shipping_cost));
        }
        if let Some(stock) = patch.stock {
            active.stock = Set(Some(stock));
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }

        let model = missing_if_not_updated(active.update(&self.orm).await)
            .inspect_err(|err| tracing::error!(error = %err, product_id = id, "failed to update product"))?;
        if model.is_none() {
            tracing::warn!(product_id = id, "product removed before update");
        }
        Ok(model.map(product_from_entity))
    }

    async fn delete(&self, id: i64) -> GatewayResult<bool> {
        let result = Products::delete_by_id(id)
            .exec(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, product_id = id, "failed to delete product"))?;
        Ok(result.rows_affected > 0)
    }
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        details: model.details,
        price: model.price.unwrap_or(Decimal::ZERO),
        shipping_cost: model.shipping_cost,
        image_url: model.image_url,
        stock: model.stock,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
