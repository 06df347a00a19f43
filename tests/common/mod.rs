#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::Router;
use libris_app::modules::authors::models::Author;
use libris_app::modules::books::models::Book;
use libris_app::{build_registry, mappings, Services};
use libris_db::{Database, InMemoryStore};
use libris_kernel::settings::{DatabaseSettings, Settings};
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub authors: InMemoryStore<Author>,
    pub books: InMemoryStore<Book>,
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn author(firstname: &str, lastname: &str) -> Author {
    Author {
        firstname: firstname.to_string(),
        lastname: lastname.to_string(),
        ..Author::default()
    }
}

/// App backed by in-memory stores seeded with `authors`
pub fn in_memory_app(authors: Vec<Author>) -> TestApp {
    let authors = InMemoryStore::with_rows(authors);
    let books = InMemoryStore::<Book>::new();
    let services = Services {
        authors: Arc::new(authors.clone()),
        books: Arc::new(books.clone()),
        mapper: Arc::new(mappings::maps()),
    };

    let registry = build_registry(&services).unwrap();
    TestApp {
        router: libris_http::build_router(&registry, &Settings::default()),
        authors,
        books,
    }
}

/// App backed by a migrated private SQLite database
pub async fn sqlite_app() -> (Router, Database) {
    let db = Database::connect(&DatabaseSettings::in_memory())
        .await
        .unwrap();
    let registry = build_registry(&libris_app::services(&db)).unwrap();
    db.apply_migrations(&registry.collect_migrations())
        .await
        .unwrap();

    (
        libris_http::build_router(&registry, &Settings::default()),
        db,
    )
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    Reply {
        status,
        headers,
        body,
    }
}
