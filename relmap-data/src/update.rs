use std::ops::{Deref, DerefMut};

use relmap_db::Connection;
use tracing::debug;

use crate::{Identifier, OperationError, OperationResult, PrimaryKey};

/// Result of an update: the base result, the record's primary key and the
/// number of rows the statement changed.
#[must_use = "operation results carry errors that must be checked"]
#[derive(Debug, Default)]
pub struct UpdateResult {
    result: OperationResult,
    primary: PrimaryKey,
    affected_rows: u64,
}

impl UpdateResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_primary(&mut self, primary: impl Into<PrimaryKey>) {
        self.primary = primary.into();
    }

    pub fn primary(&self) -> &PrimaryKey {
        &self.primary
    }

    pub fn id(&self) -> Option<Identifier> {
        self.primary.identifier()
    }

    /// Copies the row count of the connection's last statement.
    pub fn set_affected_rows_count(&mut self, connection: &dyn Connection) {
        self.affected_rows = connection.affected_rows_count();
        debug!(affected_rows = self.affected_rows, "update result recorded row count");
    }

    pub fn affected_rows_count(&self) -> u64 {
        self.affected_rows
    }

    /// See [`OperationResult::finish`]. Returns the affected-row count on success.
    pub fn finish(self) -> Result<u64, Vec<OperationError>> {
        let Self {
            mut result,
            affected_rows,
            ..
        } = self;
        result.close()?;
        Ok(affected_rows)
    }
}

impl Deref for UpdateResult {
    type Target = OperationResult;

    fn deref(&self) -> &OperationResult {
        &self.result
    }
}

impl DerefMut for UpdateResult {
    fn deref_mut(&mut self) -> &mut OperationResult {
        &mut self.result
    }
}
