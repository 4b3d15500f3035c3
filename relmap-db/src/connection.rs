//! Connection contract and the SQLite implementation.

use crate::error::DbResult;
use crate::helper::{SqlHelper, SqliteHelper};
use std::cell::Cell;
use std::path::Path;
use tracing::debug;

/// What the mapper core needs from a live storage connection.
pub trait Connection {
    /// The dialect helper for this connection.
    fn sql_helper(&self) -> &dyn SqlHelper;

    /// Rows changed by the most recent write statement.
    fn affected_rows_count(&self) -> u64;
}

/// A single-threaded SQLite connection.
pub struct SqliteConnection {
    inner: rusqlite::Connection,
    helper: SqliteHelper,
    affected_rows: Cell<u64>,
}

impl SqliteConnection {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path) -> DbResult<Self> {
        Ok(Self::wrap(rusqlite::Connection::open(path)?))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::wrap(rusqlite::Connection::open_in_memory()?))
    }

    fn wrap(inner: rusqlite::Connection) -> Self {
        Self {
            inner,
            helper: SqliteHelper,
            affected_rows: Cell::new(0),
        }
    }

    /// Executes one statement and records how many rows it changed.
    pub fn execute(&self, sql: &str) -> DbResult<usize> {
        let changed = self.inner.execute(sql, [])?;
        debug!(rows = changed, "executed statement");
        self.affected_rows.set(changed as u64);
        Ok(changed)
    }

    /// Executes several `;`-separated statements (schema setup, fixtures).
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.inner.execute_batch(sql)?;
        Ok(())
    }

    /// Runs a query returning a single integer (e.g. `SELECT COUNT(*)`).
    pub fn query_scalar(&self, sql: &str) -> DbResult<i64> {
        Ok(self.inner.query_row(sql, [], |row| row.get(0))?)
    }

    /// Underlying rusqlite connection.
    pub fn inner(&self) -> &rusqlite::Connection {
        &self.inner
    }
}

impl Connection for SqliteConnection {
    fn sql_helper(&self) -> &dyn SqlHelper {
        &self.helper
    }

    fn affected_rows_count(&self) -> u64 {
        self.affected_rows.get()
    }
}
