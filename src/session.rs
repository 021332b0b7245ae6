//! Admin session state.
//!
//! The dashboard flag lives in a key-value slot store injected into
//! [`AdminSession`]: Postgres-backed in production, in-memory in tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{db::DbPool, gateway::GatewayResult};

/// Value stored in a session slot once the admin has logged in.
pub const AUTHENTICATED: &str = "authenticated";

const SLOT_PREFIX: &str = "tea-admin";

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> GatewayResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> GatewayResult<()>;
    async fn remove(&self, key: &str) -> GatewayResult<()>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    slots: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> GatewayResult<()> {
        self.slots.write().await.remove(key);
        Ok(())
    }
}

/// Slots kept in the `session_slots` table.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn get(&self, key: &str) -> GatewayResult<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM session_slots WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    async fn set(&self, key: &str, value: &str) -> GatewayResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_slots (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> GatewayResult<()> {
        sqlx::query("DELETE FROM session_slots WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// The admin's "authenticated" flag, one slot per issued token. No expiry.
#[derive(Clone)]
pub struct AdminSession {
    store: Arc<dyn SessionStore>,
}

impl AdminSession {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    fn slot_key(token: Uuid) -> String {
        format!("{SLOT_PREFIX}:{token}")
    }

    /// Marks a fresh token as authenticated and returns it.
    pub async fn open(&self) -> GatewayResult<Uuid> {
        let token = Uuid::new_v4();
        self.store
            .set(&Self::slot_key(token), AUTHENTICATED)
            .await?;
        Ok(token)
    }

    pub async fn is_authenticated(&self, token: Uuid) -> GatewayResult<bool> {
        let value = self.store.get(&Self::slot_key(token)).await?;
        Ok(value.as_deref() == Some(AUTHENTICATED))
    }

    pub async fn clear(&self, token: Uuid) -> GatewayResult<()> {
        self.store.remove(&Self::slot_key(token)).await
    }
}
