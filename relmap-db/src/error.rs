//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
