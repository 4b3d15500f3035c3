//! The base operation result.

use std::cell::Cell;
use std::collections::BTreeMap;

use relmap_types::Value;
use tracing::warn;

use crate::OperationError;

/// Outcome of a write operation.
///
/// A result that carries errors must be inspected. Reading
/// [`is_success`](Self::is_success), [`errors`](Self::errors) or
/// [`error_messages`](Self::error_messages) marks it observed. A failed
/// result that reaches [`finish`](Self::finish) or is dropped without being
/// observed logs a warning with all of its messages.
#[must_use = "operation results carry errors that must be checked"]
#[derive(Debug, Default)]
pub struct OperationResult {
    errors: Vec<OperationError>,
    data: BTreeMap<String, Value>,
    observed: Cell<bool>,
    finished: bool,
}

impl OperationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: impl Into<OperationError>) {
        self.errors.push(error.into());
    }

    pub fn add_errors<I>(&mut self, errors: I)
    where
        I: IntoIterator,
        I::Item: Into<OperationError>,
    {
        self.errors.extend(errors.into_iter().map(Into::into));
    }

    /// Success status. Marks the result observed.
    pub fn is_success(&self) -> bool {
        self.observed.set(true);
        self.errors.is_empty()
    }

    /// Success status for the persistence layer's own bookkeeping.
    ///
    /// Does not mark the result observed, so callers are still expected to check it.
    pub fn is_success_internal(&self) -> bool {
        self.errors.is_empty()
    }

    /// Marks the result observed.
    pub fn errors(&self) -> &[OperationError] {
        self.observed.set(true);
        &self.errors
    }

    /// Marks the result observed.
    pub fn error_messages(&self) -> Vec<String> {
        self.observed.set(true);
        self.messages()
    }

    pub fn is_observed(&self) -> bool {
        self.observed.get()
    }

    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    pub fn set_data(&mut self, data: BTreeMap<String, Value>) {
        self.data = data;
    }

    pub fn insert_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    /// Ends the result's lifetime explicitly.
    ///
    /// Warns like `Drop` would, then hands back the data on success or the
    /// errors on failure.
    pub fn finish(mut self) -> Result<BTreeMap<String, Value>, Vec<OperationError>> {
        self.close()?;
        Ok(std::mem::take(&mut self.data))
    }

    /// Runs the unobserved-failure check once and takes the errors.
    pub(crate) fn close(&mut self) -> Result<(), Vec<OperationError>> {
        if !self.finished {
            self.finished = true;
            self.warn_if_unobserved();
        }
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message().to_string()).collect()
    }

    fn warn_if_unobserved(&self) {
        if self.errors.is_empty() || self.observed.get() {
            return;
        }
        warn!(
            error_count = self.errors.len(),
            messages = %self.messages().join("; "),
            "operation result discarded with unexamined errors"
        );
    }
}

impl Drop for OperationResult {
    fn drop(&mut self) {
        if !self.finished {
            self.warn_if_unobserved();
        }
    }
}
