//! The generic repository contract shared by every resource.
//!
//! A repository instance is a unit of work: reads go straight to the store,
//! while `create`, `update` and `delete` stage a change and immediately call
//! [`Repository::save`] to commit it. Instances are cheap and meant to live
//! for a single request, so staged changes are never shared between requests.
//!
//! Mutating operations answer with a coarse `bool`. `false` covers a
//! constraint violation, an update or delete that matched no row, and a save
//! with nothing staged; the reason goes to the log. `Err` is reserved for
//! storage faults.

use async_trait::async_trait;

use crate::error::DbResult;

/// A persisted record with a store-assigned integer identity.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Human readable name used in log lines
    const NAME: &'static str;

    /// Identity; `0` until the store assigns one
    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);
}

#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// `true` iff a record with that id currently persists
    async fn exists(&self, id: i64) -> DbResult<bool>;

    /// Every persisted record, ordered by id
    async fn find_all(&self) -> DbResult<Vec<T>>;

    async fn find_by_id(&self, id: i64) -> DbResult<Option<T>>;

    /// Insert `entity`; on success its id is replaced by the assigned one
    async fn create(&mut self, entity: &mut T) -> DbResult<bool>;

    /// Overwrite the record with the same id
    async fn update(&mut self, entity: &T) -> DbResult<bool>;

    async fn delete(&mut self, entity: &T) -> DbResult<bool>;

    /// Commit every staged change atomically
    async fn save(&mut self) -> DbResult<bool>;
}

/// Hands out a fresh unit of work per request.
pub trait RepositoryFactory<T: Entity>: Send + Sync {
    fn repository(&self) -> Box<dyn Repository<T>>;
}

/// A change waiting for the next save.
#[derive(Debug, Clone)]
pub(crate) enum Staged<T> {
    Insert(T),
    Update(T),
    Delete(i64),
}

impl<T> Staged<T> {
    pub(crate) fn verb(&self) -> &'static str {
        match self {
            Staged::Insert(_) => "insert",
            Staged::Update(_) => "update",
            Staged::Delete(_) => "delete",
        }
    }
}
