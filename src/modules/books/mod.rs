pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_db::RepositoryFactory;
use libris_kernel::{InitCtx, Mapper, Migration, Module};

use crate::modules::authors::models::Author;
use models::Book;

/// Handler state for the books resource. Authors are only consulted to
/// check that a new book's owner exists.
#[derive(Clone)]
pub struct BooksState {
    pub books: Arc<dyn RepositoryFactory<Book>>,
    pub authors: Arc<dyn RepositoryFactory<Author>>,
    pub mapper: Arc<Mapper>,
}

pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(state: BooksState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::get_books).post(handlers::create_book))
            .route("/{id}", get(handlers::get_book))
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

        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Every book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "500": error
                        }
                    },
                    "post": {
                        "summary": "Add a book to an existing author",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookCreate" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "data": { "$ref": "#/components/schemas/Book" }
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
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "id",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "integer", "format": "int64" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error,
                            "500": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "year": { "type": ["integer", "null"] },
                            "isbn": { "type": ["string", "null"] },
                            "summary": { "type": ["string", "null"] },
                            "author_id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id", "title", "author_id"]
                    },
                    "BookCreate": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1 },
                            "year": { "type": ["integer", "null"], "minimum": 0, "maximum": 9999 },
                            "isbn": { "type": ["string", "null"], "minLength": 10, "maxLength": 17 },
                            "summary": { "type": ["string", "null"] },
                            "author_id": { "type": "integer", "format": "int64", "minimum": 1 }
                        },
                        "required": ["title", "author_id"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id        INTEGER PRIMARY KEY AUTOINCREMENT,
                    title     TEXT NOT NULL CHECK (length(trim(title)) > 0),
                    year      INTEGER,
                    isbn      TEXT,
                    summary   TEXT,
                    author_id INTEGER NOT NULL REFERENCES authors (id) ON DELETE CASCADE
                );
                CREATE INDEX IF NOT EXISTS books_author_id_idx ON books (author_id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(state: BooksState) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(state))
}
