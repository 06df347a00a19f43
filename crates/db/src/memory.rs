//! In-memory implementation of [`Repository`].
//!
//! Behaves like the SQL repository for its own table: ids start at 1 and are
//! never reused, and updates and deletes of unknown ids report `false`. Each
//! store is a single isolated table, so related rows are never loaded and
//! deletes never cascade; rows hold whatever children they were stored with.
//!
//! Adds hooks for exercising handler error paths: an operation counter, a
//! switch making every commit report failure, and a switch making every call
//! raise a storage fault.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{Entity, Repository, RepositoryFactory, Staged};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

/// Shared in-memory table. Clones share the same rows and counters.
pub struct InMemoryStore<T> {
    table: Arc<Mutex<Table<T>>>,
    operations: Arc<AtomicUsize>,
    reject_commits: Arc<AtomicBool>,
    offline: Arc<AtomicBool>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            operations: self.operations.clone(),
            reject_commits: self.reject_commits.clone(),
            offline: self.offline.clone(),
        }
    }
}

impl<T: Entity> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            })),
            operations: Arc::new(AtomicUsize::new(0)),
            reject_commits: Arc::new(AtomicBool::new(false)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Store pre-populated with `rows`; entities with id `0` get a fresh id.
    pub fn with_rows(rows: impl IntoIterator<Item = T>) -> Self {
        let store = Self::new();
        if let Ok(mut table) = store.table.lock() {
            for mut row in rows {
                if row.id() == 0 {
                    table.last_id += 1;
                    row.set_id(table.last_id);
                }
                table.last_id = table.last_id.max(row.id());
                table.rows.insert(row.id(), row);
            }
        }
        store
    }

    /// Repository calls made through any unit of work of this store
    pub fn operation_count(&self) -> usize {
        self.operations.load(Ordering::SeqCst)
    }

    /// Make every commit report `false`, as a constraint violation would.
    pub fn reject_commits(&self, reject: bool) {
        self.reject_commits.store(reject, Ordering::SeqCst);
    }

    /// Make every call fail with [`DbError::ConnectionFailed`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Snapshot of the stored rows, ordered by id
    pub fn rows(&self) -> Vec<T> {
        self.table
            .lock()
            .map(|table| table.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Table<T>>> {
        self.table
            .lock()
            .map_err(|_| DbError::Internal("in-memory table lock poisoned".to_string()))
    }

    fn enter(&self) -> DbResult<()> {
        self.operations.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(DbError::ConnectionFailed("store is offline".to_string()));
        }
        Ok(())
    }
}

/// Unit of work over an [`InMemoryStore`].
pub struct InMemoryRepository<T> {
    store: InMemoryStore<T>,
    pending: Vec<Staged<T>>,
    assigned_ids: Vec<i64>,
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new(store: InMemoryStore<T>) -> Self {
        Self {
            store,
            pending: Vec::new(),
            assigned_ids: Vec::new(),
        }
    }

    fn commit(&mut self) -> DbResult<bool> {
        self.assigned_ids.clear();
        if self.pending.is_empty() {
            return Ok(false);
        }

        let staged = std::mem::take(&mut self.pending);
        if self.store.reject_commits.load(Ordering::SeqCst) {
            warn!(entity = T::NAME, changes = staged.len(), "commit rejected");
            return Ok(false);
        }

        let mut table = self.store.lock()?;

        // All-or-nothing: check every change before applying any.
        for change in &staged {
            let known = match change {
                Staged::Insert(_) => true,
                Staged::Update(entity) => table.rows.contains_key(&entity.id()),
                Staged::Delete(id) => table.rows.contains_key(id),
            };
            if !known {
                warn!(
                    entity = T::NAME,
                    operation = change.verb(),
                    "staged change matched no rows"
                );
                return Ok(false);
            }
        }

        for change in staged {
            match change {
                Staged::Insert(mut entity) => {
                    table.last_id += 1;
                    let id = table.last_id;
                    entity.set_id(id);
                    table.rows.insert(id, entity);
                    self.assigned_ids.push(id);
                }
                Staged::Update(entity) => {
                    table.rows.insert(entity.id(), entity);
                }
                Staged::Delete(id) => {
                    table.rows.remove(&id);
                }
            }
        }

        debug!(entity = T::NAME, "changes committed");
        Ok(true)
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn exists(&self, id: i64) -> DbResult<bool> {
        self.store.enter()?;
        Ok(self.store.lock()?.rows.contains_key(&id))
    }

    async fn find_all(&self) -> DbResult<Vec<T>> {
        self.store.enter()?;
        Ok(self.store.lock()?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<T>> {
        self.store.enter()?;
        Ok(self.store.lock()?.rows.get(&id).cloned())
    }

    async fn create(&mut self, entity: &mut T) -> DbResult<bool> {
        self.store.enter()?;
        self.pending.push(Staged::Insert(entity.clone()));
        if !self.commit()? {
            return Ok(false);
        }
        if let Some(id) = self.assigned_ids.last() {
            entity.set_id(*id);
        }
        Ok(true)
    }

    async fn update(&mut self, entity: &T) -> DbResult<bool> {
        self.store.enter()?;
        self.pending.push(Staged::Update(entity.clone()));
        self.commit()
    }

    async fn delete(&mut self, entity: &T) -> DbResult<bool> {
        self.store.enter()?;
        self.pending.push(Staged::Delete(entity.id()));
        self.commit()
    }

    async fn save(&mut self) -> DbResult<bool> {
        self.store.enter()?;
        self.commit()
    }
}

impl<T: Entity> RepositoryFactory<T> for InMemoryStore<T> {
    fn repository(&self) -> Box<dyn Repository<T>> {
        Box::new(InMemoryRepository::new(self.clone()))
    }
}
