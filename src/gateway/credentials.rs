use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    db::OrmConn,
    entity::admin_users::{Column, Entity as AdminUsers},
    gateway::{CredentialStore, GatewayResult},
    models::AdminCredential,
};

#[derive(Clone)]
pub struct SeaOrmCredentials {
    orm: OrmConn,
}

impl SeaOrmCredentials {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl CredentialStore for SeaOrmCredentials {
    async fn find_active_by_email(&self, email: &str) -> GatewayResult<Vec<AdminCredential>> {
        let records = AdminUsers::find()
            .filter(Column::Email.eq(email))
            .filter(Column::Active.eq(true))
            .all(&self.orm)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "admin credential lookup failed"))?
            .into_iter()
            .map(|model| AdminCredential {
                id: model.id,
                email: model.email,
                password_hash: model.password_hash,
                role: model.role,
            })
            .collect();
        Ok(records)
    }
}
