use foodshop_core::storage::{CartStorage, StorageError};
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::{connect_with_settings, migrations, DbPool};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to initialize storage runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

/// Key-value cart storage in a SQLite `kv_store` table.
///
/// The cart manager calls storage synchronously, so this store owns a
/// current-thread runtime and blocks on each query. It must not be used from
/// inside another tokio runtime.
pub struct SqliteStorage {
    runtime: Runtime,
    pool: DbPool,
}

impl SqliteStorage {
    pub fn open(
        database_url: &str,
        max_connections: u32,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let runtime = Builder::new_current_thread().enable_all().build().map_err(StoreError::Runtime)?;

        let pool = runtime.block_on(async {
            let pool = connect_with_settings(database_url, max_connections, timeout_secs)
                .await
                .map_err(StoreError::DatabaseConnect)?;
            migrations::run_pending(&pool).await.map_err(StoreError::Migration)?;
            Ok::<_, StoreError>(pool)
        })?;

        info!(event_name = "storage.sqlite.opened", database_url, "sqlite cart storage ready");
        Ok(Self { runtime, pool })
    }

    pub fn close(self) {
        self.runtime.block_on(self.pool.close());
    }
}

impl CartStorage for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.runtime
            .block_on(
                sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
                    .bind(key)
                    .fetch_optional(&self.pool),
            )
            .map_err(|error| StorageError::Backend(error.to_string()))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.runtime
            .block_on(
                sqlx::query(
                    "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP) \
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                )
                .bind(key)
                .bind(value)
                .execute(&self.pool),
            )
            .map(|_| ())
            .map_err(|error| StorageError::Backend(error.to_string()))
    }
}
