//! SQLite persistence for Libris: connection pool, module migrations and the
//! generic repository contract with its SQL and in-memory implementations.

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sql;

pub use error::{DbError, DbResult};
pub use memory::{InMemoryRepository, InMemoryStore};
pub use pool::Database;
pub use repository::{Entity, Repository, RepositoryFactory};
pub use sql::{fetch_children, SqlEntity, SqlRepository, SqlValue};
