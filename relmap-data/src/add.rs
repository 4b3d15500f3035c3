use std::ops::{Deref, DerefMut};

use relmap_types::Value;

use crate::{Identifier, OperationError, OperationResult, PrimaryKey};

/// Result of an insert: the base result plus the new record's primary key.
#[must_use = "operation results carry errors that must be checked"]
#[derive(Debug, Default)]
pub struct AddResult {
    result: OperationResult,
    primary: PrimaryKey,
}

impl AddResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a single-column key under `ID`.
    pub fn set_id(&mut self, id: impl Into<Value>) {
        self.primary = PrimaryKey::id(id);
    }

    pub fn set_primary(&mut self, primary: impl Into<PrimaryKey>) {
        self.primary = primary.into();
    }

    pub fn primary(&self) -> &PrimaryKey {
        &self.primary
    }

    /// The key value for single-column keys, the full map for composite ones.
    pub fn id(&self) -> Option<Identifier> {
        self.primary.identifier()
    }

    /// See [`OperationResult::finish`]. Returns the primary key on success.
    pub fn finish(self) -> Result<PrimaryKey, Vec<OperationError>> {
        let Self {
            mut result,
            primary,
        } = self;
        result.close()?;
        Ok(primary)
    }
}

impl Deref for AddResult {
    type Target = OperationResult;

    fn deref(&self) -> &OperationResult {
        &self.result
    }
}

impl DerefMut for AddResult {
    fn deref_mut(&mut self) -> &mut OperationResult {
        &mut self.result
    }
}
