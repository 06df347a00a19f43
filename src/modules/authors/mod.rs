pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::RepositoryFactory;
use libris_kernel::{InitCtx, Mapper, Migration, Module};

use models::Author;

/// Handler state for the authors resource
#[derive(Clone)]
pub struct AuthorsState {
    pub authors: Arc<dyn RepositoryFactory<Author>>,
    pub mapper: Arc<Mapper>,
}

pub struct AuthorsModule {
    state: AuthorsState,
}

impl AuthorsModule {
    pub fn new(state: AuthorsState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route(
                "/",
                get(handlers::get_authors).post(handlers::create_author),
            )
            .route(
                "/{id}",
                get(handlers::get_author)
                    .put(handlers::update_author)
                    .delete(handlers::delete_author),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = serde_json::json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let id_param = serde_json::json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "Every author with their books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Author" }
                                        }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Author created",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "data": { "$ref": "#/components/schemas/Author" }
                                            },
                                            "required": ["data"]
                                        }
                                    }
                                }
                            },
                            "400": error,
                            "500": error
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "The author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "404": error,
                            "500": error
                        }
                    },
                    "put": {
                        "summary": "Replace an author",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorUpdate" }
                                }
                            }
                        },
                        "responses": {
                            "204": { "description": "Author updated" },
                            "400": error,
                            "500": error
                        }
                    },
                    "delete": {
                        "summary": "Delete an author and their books",
                        "tags": ["Authors"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Author deleted" },
                            "400": error,
                            "404": error,
                            "500": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "firstname": { "type": "string" },
                            "lastname": { "type": "string" },
                            "bio": { "type": ["string", "null"] },
                            "books": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["id", "firstname", "lastname", "books"]
                    },
                    "AuthorCreate": {
                        "type": "object",
                        "properties": {
                            "firstname": { "type": "string", "minLength": 1 },
                            "lastname": { "type": "string", "minLength": 1 },
                            "bio": { "type": ["string", "null"] }
                        },
                        "required": ["firstname", "lastname"]
                    },
                    "AuthorUpdate": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Must equal the id in the path"
                            },
                            "firstname": { "type": "string", "minLength": 1 },
                            "lastname": { "type": "string", "minLength": 1 },
                            "bio": { "type": ["string", "null"] }
                        },
                        "required": ["id", "firstname", "lastname"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_authors",
            up: r#"
                CREATE TABLE IF NOT EXISTS authors (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    firstname TEXT NOT NULL CHECK (length(trim(firstname)) > 0),
                    lastname  TEXT NOT NULL CHECK (length(trim(lastname)) > 0),
                    bio       TEXT
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new instance of the authors module
pub fn create_module(state: AuthorsState) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(state))
}
