use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::{
    db::OrmConn,
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Entity as Products, Model as ProductModel},
    },
    gateway::{GatewayResult, OrderGateway, missing_if_not_updated},
    models::{NewOrder, Order, OrderListing, OrderStatus},
};

/// Order gateway over the backend's `orders` table.
#[derive(Clone)]
pub struct SeaOrmOrders {
    orm: OrmConn,
}

impl SeaOrmOrders {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl OrderGateway for SeaOrmOrders {
    async fn submit(&self, order: NewOrder) -> GatewayResult<Order> {
        let status = order.status.unwrap_or_default();
        let active = OrderActive {
            id: NotSet,
            product_id: Set(order.product_id),
            customer_name: Set(order.customer_name),
            customer_email: Set(order.customer_email),
            customer_phone: Set(order.customer_phone),
            customer_address: Set(order.customer_address),
            quantity: Set(order.quantity),
            total_price: Set(Some(order.total_price)),
            status: Set(Some(status.into())),
            created_at: NotSet,
        };
        let model = active
            .insert(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to submit order"))?;
        Ok(order_from_entity(model))
    }

    async fn list(&self) -> GatewayResult<Vec<OrderListing>> {
        let rows = Orders::find()
            .find_also_related(Products)
            .order_by_desc(OrderCol::CreatedAt)
            .order_by_desc(OrderCol::Id)
            .all(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "failed to fetch orders"))?;

        Ok(rows
            .into_iter()
            .map(|(order, product): (OrderModel, Option<ProductModel>)| {
                OrderListing::new(order_from_entity(order), product.map(|p| p.name))
            })
            .collect())
    }

    async fn update_status(&self, id: i64, status: OrderStatus) -> GatewayResult<Option<Order>> {
        let existing = Orders::find_by_id(id).one(&self.orm).await?;
        let existing = match existing {
            Some(o) => o,
            None => return Ok(None),
        };

        let mut active: OrderActive = existing.into();
        active.status = Set(Some(status.into()));
        let order = missing_if_not_updated(active.update(&self.orm).await)
            .inspect_err(|err| tracing::error!(error = %err, order_id = id, "failed to update order status"))?;
        if order.is_none() {
            tracing::warn!(order_id = id, "order removed before status update");
        }
        Ok(order.map(order_from_entity))
    }
}

fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        product_id: model.product_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email.filter(|email| !email.is_empty()),
        customer_phone: model.customer_phone,
        customer_address: model.customer_address,
        quantity: model.quantity,
        total_price: model.total_price.unwrap_or(Decimal::ZERO),
        status: model.status.map(OrderStatus::from).unwrap_or_default(),
        created_at: model.created_at.with_timezone(&Utc),
    }
}
