//! Runner for module-contributed migrations.
//!
//! Applied migrations are recorded as `(module, id)` rows in
//! `schema_migrations`. Each pending migration runs in its own transaction
//! together with its bookkeeping row, so a failed migration leaves no trace.

use libris_kernel::Migration;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

const BOOKKEEPING: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration in `pending` that has not run yet, in slice order.
pub async fn run_migrations(pool: &SqlitePool, pending: &[(String, Migration)]) -> DbResult<usize> {
    sqlx::query(BOOKKEEPING).execute(pool).await?;

    let mut applied = 0;
    for (module, migration) in pending {
        if is_applied(pool, module, migration.id).await? {
            continue;
        }

        info!(module = %module, migration = migration.id, "applying migration");

        let failed = |err: sqlx::Error| DbError::MigrationFailed {
            module: module.clone(),
            id: migration.id.to_string(),
            message: err.to_string(),
        };

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES (?, ?)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(failed)?;
        tx.commit().await.map_err(failed)?;

        applied += 1;
    }

    info!(applied, total = pending.len(), "migrations up to date");
    Ok(applied)
}

async fn is_applied(pool: &SqlitePool, module: &str, id: &str) -> DbResult<bool> {
    let found: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE module = ? AND id = ?)",
    )
    .bind(module)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(found != 0)
}

/// `(module, id)` pairs already recorded, oldest first.
pub async fn applied_migrations(pool: &SqlitePool) -> DbResult<Vec<(String, String)>> {
    sqlx::query(BOOKKEEPING).execute(pool).await?;
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT module, id FROM schema_migrations ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
