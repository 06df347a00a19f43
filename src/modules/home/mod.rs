use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Json, Router};
use libris_kernel::Module;

/// Liveness probe kept at `/api/home`
pub struct HomeModule;

#[async_trait]
impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self) -> Router {
        Router::new().route("/", get(home))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Liveness probe",
                        "tags": ["Home"],
                        "responses": {
                            "200": {
                                "description": "Always [\"ok\"]",
                                "content": {
                                    "application/json": {
                                        "schema": { "type": "array", "items": { "type": "string" } }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }))
    }
}

async fn home() -> Json<[&'static str; 1]> {
    tracing::info!("home probed");
    Json(["ok"])
}

pub fn create_module() -> Arc<dyn Module> {
    Arc::new(HomeModule)
}
