use std::sync::Arc;

use crate::{
    cart::CartRegistry,
    config::AppConfig,
    db::{DbPool, OrmConn},
    gateway::{
        CatalogGateway, CredentialStore, HttpObjectStorage, ImageStorage, OrderGateway,
        SeaOrmCatalog, SeaOrmCredentials, SeaOrmOrders,
    },
    session::{AdminSession, PgSessionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogGateway>,
    pub orders: Arc<dyn OrderGateway>,
    pub credentials: Arc<dyn CredentialStore>,
    pub images: Arc<dyn ImageStorage>,
    pub admin: AdminSession,
    pub carts: CartRegistry,
}

impl AppState {
    /// Wires every gateway to the hosted backend.
    pub fn connect(config: &AppConfig, orm: OrmConn, pool: DbPool) -> Self {
        Self {
            catalog: Arc::new(SeaOrmCatalog::new(orm.clone())),
            orders: Arc::new(SeaOrmOrders::new(orm.clone())),
            credentials: Arc::new(SeaOrmCredentials::new(orm)),
            images: Arc::new(HttpObjectStorage::new(config)),
            admin: AdminSession::new(Arc::new(PgSessionStore::new(pool))),
            carts: CartRegistry::new(),
        }
    }
}
