//! Errors collected by write operations.

use thiserror::Error;

/// One failure recorded in an [`OperationResult`](crate::OperationResult).
///
/// Entity-level failures have no field; field-level failures name the field
/// that failed validation or conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    message: String,
    code: Option<String>,
    field: Option<String>,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            field: None,
        }
    }

    /// A failure attached to one field.
    pub fn for_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::new(message)
        }
    }

    /// Attaches a machine-readable code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl From<&str> for OperationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for OperationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
