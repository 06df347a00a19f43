//! Database error types.
//!
//! Business-level write failures (constraint violations, zero affected rows)
//! never surface here: repositories report them as `Ok(false)`. A `DbError`
//! means the store itself misbehaved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A UNIQUE index rejected the write.
    #[error("unique constraint failed: {field}")]
    UniqueViolation { field: String },

    /// A row references a parent that does not exist, or a parent still has
    /// children.
    #[error("foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// NOT NULL or CHECK constraint.
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("migration '{id}' of module '{module}' failed: {message}")]
    MigrationFailed {
        module: String,
        id: String,
        message: String,
    },

    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("connection pool exhausted")]
    PoolExhausted,

    #[error("internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether the store refused the data rather than failing to run.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::UniqueViolation { .. }
                | DbError::ForeignKeyViolation { .. }
                | DbError::ConstraintViolation { .. }
        )
    }
}

/// SQLite reports constraint failures through the message text:
///
/// ```text
/// UNIQUE constraint failed: <table>.<column>
/// FOREIGN KEY constraint failed
/// NOT NULL constraint failed: <table>.<column>
/// CHECK constraint failed: <name>
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("constraint failed") {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),

            sqlx::Error::Io(io) => DbError::ConnectionFailed(io.to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
