//! Libris application library
//!
//! Resource modules (authors, books, home), their mapping rules, and the
//! bootstrap shared by the `libris` binary and the CLI.

pub mod mappings;
pub mod modules;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use libris_db::Database;
use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};

pub use modules::{register_all, Services};

/// Registry with every resource module wired to `services`
pub fn build_registry(services: &Services) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, services)?;
    Ok(registry)
}

/// Services backed by `db` with the application's mapping rules
pub fn services(db: &Database) -> Services {
    Services::from_database(db, Arc::new(mappings::maps()))
}

/// Boot the application and serve HTTP until shutdown.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;
    let registry = build_registry(&services(&db))?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;

    if settings.database.run_migrations {
        let applied = db
            .apply_migrations(&registry.collect_migrations())
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, "migrations complete");
    } else {
        tracing::info!("migrations skipped by configuration");
    }

    registry.start_modules(&ctx).await?;

    let served = libris_http::start_server(&registry, &settings).await;

    registry.stop_modules().await?;
    db.close().await;
    served
}

/// Apply pending migrations and exit. Returns the number applied.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let db = Database::connect(&settings.database)
        .await
        .context("failed to open database")?;
    let registry = build_registry(&services(&db))?;

    let applied = db
        .apply_migrations(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    db.close().await;

    tracing::info!(applied, url = %settings.database.url, "migrations complete");
    Ok(applied)
}
