//! Connection pool creation for SQLite.

use std::str::FromStr;

use libris_kernel::settings::DatabaseSettings;
use libris_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;

/// Shared handle to the SQLite pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool described by `settings`.
    ///
    /// In-memory databases live only as long as their connection, so such
    /// URLs are pinned to one connection that is never recycled.
    pub async fn connect(settings: &DatabaseSettings) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .map_err(|err| DbError::ConnectionFailed(err.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = is_in_memory(&settings.url);
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|err| DbError::ConnectionFailed(err.to_string()))?;

        info!(url = %settings.url, in_memory, "database pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Apply pending module migrations; returns how many ran.
    pub async fn apply_migrations(&self, pending: &[(String, Migration)]) -> DbResult<usize> {
        migrations::run_migrations(&self.pool, pending).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
