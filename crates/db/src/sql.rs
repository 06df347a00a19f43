//! SQLite implementation of [`Repository`], driven by a per-entity column table.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::{Entity, Repository, RepositoryFactory, Staged};

type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// A single bindable column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(Option<i64>),
    Text(Option<String>),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(Some(value))
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(Some(value))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        SqlValue::Text(value)
    }
}

/// Table description for an entity stored by [`SqlRepository`].
///
/// Every table has an `INTEGER PRIMARY KEY` column named `id`. `COLUMNS`
/// lists the remaining columns, and `values` returns them in the same order.
#[async_trait]
pub trait SqlEntity: Entity + for<'r> FromRow<'r, SqliteRow> {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn values(&self) -> Vec<SqlValue>;

    /// Populate relationships after rows were read. Runs on every read path.
    async fn load_related(_rows: &mut [Self], _pool: &SqlitePool) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Integer(value) => query.bind(value),
        SqlValue::Text(value) => query.bind(value),
    }
}

fn select_sql<T: SqlEntity>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn insert_sql<T: SqlEntity>() -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        T::COLUMNS.join(", "),
        vec!["?"; T::COLUMNS.len()].join(", ")
    )
}

fn update_sql<T: SqlEntity>() -> String {
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .map(|column| format!("{column} = ?"))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = ?",
        T::TABLE,
        assignments.join(", ")
    )
}

/// Parent ids bound per child query; SQLite caps variables per statement.
const CHILD_QUERY_CHUNK: usize = 500;

/// Load the `C` rows whose `foreign_key` column is one of `parent_ids`,
/// ordered by id.
pub async fn fetch_children<C: SqlEntity>(
    pool: &SqlitePool,
    foreign_key: &str,
    parent_ids: &[i64],
) -> Result<Vec<C>, sqlx::Error> {
    fetch_children_chunked(pool, foreign_key, parent_ids, CHILD_QUERY_CHUNK).await
}

async fn fetch_children_chunked<C: SqlEntity>(
    pool: &SqlitePool,
    foreign_key: &str,
    parent_ids: &[i64],
    chunk_size: usize,
) -> Result<Vec<C>, sqlx::Error> {
    let mut children = Vec::new();

    for chunk in parent_ids.chunks(chunk_size.max(1)) {
        let sql = format!(
            "{} WHERE {} IN ({})",
            select_sql::<C>(),
            foreign_key,
            vec!["?"; chunk.len()].join(", ")
        );
        let rows = chunk
            .iter()
            .fold(sqlx::query_as::<_, C>(&sql), |query, id| query.bind(*id))
            .fetch_all(pool)
            .await?;
        children.extend(rows);
    }

    if children.is_empty() {
        return Ok(children);
    }
    children.sort_by_key(|child| child.id());
    C::load_related(&mut children, pool).await?;
    Ok(children)
}

/// Unit of work over one SQLite table.
pub struct SqlRepository<T> {
    pool: SqlitePool,
    pending: Vec<Staged<T>>,
    assigned_ids: Vec<i64>,
}

impl<T: SqlEntity> SqlRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            pending: Vec::new(),
            assigned_ids: Vec::new(),
        }
    }

    /// Number of changes staged and not yet saved
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl<T: SqlEntity> Repository<T> for SqlRepository<T> {
    async fn exists(&self, id: i64) -> DbResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", T::TABLE);
        let found: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(found != 0)
    }

    async fn find_all(&self) -> DbResult<Vec<T>> {
        let sql = format!("{} ORDER BY id", select_sql::<T>());
        let mut rows = sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await?;
        T::load_related(&mut rows, &self.pool).await?;

        debug!(entity = T::NAME, count = rows.len(), "loaded all rows");
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> DbResult<Option<T>> {
        let sql = format!("{} WHERE id = ?", select_sql::<T>());
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let mut rows = vec![row];
                T::load_related(&mut rows, &self.pool).await?;
                Ok(rows.pop())
            }
            None => Ok(None),
        }
    }

    async fn create(&mut self, entity: &mut T) -> DbResult<bool> {
        self.pending.push(Staged::Insert(entity.clone()));
        if !self.save().await? {
            return Ok(false);
        }

        if let Some(id) = self.assigned_ids.last() {
            entity.set_id(*id);
        }
        debug!(entity = T::NAME, id = entity.id(), "row created");
        Ok(true)
    }

    async fn update(&mut self, entity: &T) -> DbResult<bool> {
        self.pending.push(Staged::Update(entity.clone()));
        self.save().await
    }

    async fn delete(&mut self, entity: &T) -> DbResult<bool> {
        self.pending.push(Staged::Delete(entity.id()));
        self.save().await
    }

    async fn save(&mut self) -> DbResult<bool> {
        self.assigned_ids.clear();
        if self.pending.is_empty() {
            debug!(entity = T::NAME, "save called with nothing staged");
            return Ok(false);
        }

        let staged = std::mem::take(&mut self.pending);
        let mut tx = self.pool.begin().await?;

        for change in &staged {
            let result = match change {
                Staged::Insert(entity) => {
                    let sql = insert_sql::<T>();
                    entity
                        .values()
                        .into_iter()
                        .fold(sqlx::query::<Sqlite>(&sql), bind_value)
                        .execute(&mut *tx)
                        .await
                }
                Staged::Update(entity) => {
                    let sql = update_sql::<T>();
                    entity
                        .values()
                        .into_iter()
                        .fold(sqlx::query::<Sqlite>(&sql), bind_value)
                        .bind(entity.id())
                        .execute(&mut *tx)
                        .await
                }
                Staged::Delete(id) => {
                    let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
                    sqlx::query::<Sqlite>(&sql)
                        .bind(*id)
                        .execute(&mut *tx)
                        .await
                }
            };

            match result {
                Ok(done) if done.rows_affected() == 0 => {
                    warn!(
                        entity = T::NAME,
                        operation = change.verb(),
                        "staged change matched no rows, rolling back"
                    );
                    tx.rollback().await?;
                    self.assigned_ids.clear();
                    return Ok(false);
                }
                Ok(done) => {
                    if let Staged::Insert(_) = change {
                        self.assigned_ids.push(done.last_insert_rowid());
                    }
                }
                Err(err) => {
                    let err = DbError::from(err);
                    if !err.is_constraint_violation() {
                        return Err(err);
                    }
                    warn!(
                        entity = T::NAME,
                        operation = change.verb(),
                        reason = %err,
                        "store rejected staged change, rolling back"
                    );
                    tx.rollback().await?;
                    self.assigned_ids.clear();
                    return Ok(false);
                }
            }
        }

        tx.commit().await?;
        debug!(entity = T::NAME, changes = staged.len(), "changes committed");
        Ok(true)
    }
}

impl<T: SqlEntity> RepositoryFactory<T> for Database {
    fn repository(&self) -> Box<dyn Repository<T>> {
        Box::new(SqlRepository::<T>::new(self.pool().clone()))
    }
}
