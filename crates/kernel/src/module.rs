use async_trait::async_trait;
use axum::Router;

/// Context handed to modules while the application boots
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A schema change contributed by a module.
///
/// `id` must be unique within its module and is recorded once applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A self-contained resource mounted by the HTTP layer
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name, also used as the route prefix `/api/{name}`
    fn name(&self) -> &'static str;

    /// Called once during startup, before migrations are applied
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes for this module, with any handler state already attached
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` + `components.schemas`) for this module.
    /// Paths are relative to the module prefix.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations for this module, applied in the order returned
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Called after migrations are complete
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
