// SPDX-FileCopyrightText: 2026 Orderly Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`OrderStore`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use orderly_config::model::StorageConfig;
use orderly_core::{
    AdapterType, FieldId, HealthStatus, NewOrder, Order, OrderId, OrderStore, OrderlyError,
    PluginAdapter, StoreSnapshot,
};

use crate::database::{map_tr_err, Database};
use crate::queries::orders;

/// SQLite-backed order store.
///
/// The database is opened by [`OrderStore::initialize`]; every other call
/// fails with a storage error until then.
pub struct SqliteOrderStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteOrderStore {
    /// Creates the store without touching the disk.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Creates and initializes a store in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, OrderlyError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    fn db(&self) -> Result<&Database, OrderlyError> {
        self.db
            .get()
            .ok_or_else(|| OrderlyError::storage("order store not initialized"))
    }

    async fn checkpoint(&self) -> Result<(), OrderlyError> {
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| -> Result<(), rusqlite::Error> {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(map_tr_err)?;
            debug!("WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteOrderStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, OrderlyError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OrderlyError> {
        self.checkpoint().await
    }
}

#[async_trait]
impl OrderStore for SqliteOrderStore {
    async fn initialize(&self) -> Result<(), OrderlyError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| OrderlyError::storage("order store already initialized"))?;
        info!(path = %self.config.database_path, "order store ready");
        Ok(())
    }

    async fn close(&self) -> Result<(), OrderlyError> {
        self.db()?;
        self.checkpoint().await
    }

    async fn load(&self) -> Result<StoreSnapshot, OrderlyError> {
        orders::load_snapshot(self.db()?).await
    }

    async fn save(&self, snapshot: &StoreSnapshot) -> Result<(), OrderlyError> {
        orders::replace_snapshot(self.db()?, snapshot).await
    }

    async fn commit(&self, order: NewOrder) -> Result<Order, OrderlyError> {
        let committed = orders::commit_order(self.db()?, order).await?;
        debug!(order_id = committed.id.0, "order committed");
        Ok(committed)
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>, OrderlyError> {
        orders::get_order(self.db()?, id).await
    }

    async fn list(&self) -> Result<Vec<Order>, OrderlyError> {
        orders::list_orders(self.db()?).await
    }

    async fn update_field(
        &self,
        id: OrderId,
        field: FieldId,
        value: &str,
    ) -> Result<Option<Order>, OrderlyError> {
        orders::update_field(self.db()?, id, field, value).await
    }

    async fn mark_ready(&self, id: OrderId) -> Result<bool, OrderlyError> {
        orders::mark_ready(self.db()?, id).await
    }

    async fn delete(&self, id: OrderId) -> Result<bool, OrderlyError> {
        orders::delete_order(self.db()?, id).await
    }
}
