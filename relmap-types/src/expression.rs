use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw SQL fragment that must reach the storage layer untouched.
///
/// Fields, codecs and dialect helpers pass an expression through verbatim:
/// no quoting, escaping or serialization is ever applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqlExpression(String);

impl SqlExpression {
    /// Wraps a raw SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self(sql.into())
    }

    /// Returns the SQL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the expression, returning the SQL text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SqlExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SqlExpression {
    fn from(sql: &str) -> Self {
        Self::new(sql)
    }
}

impl From<String> for SqlExpression {
    fn from(sql: String) -> Self {
        Self(sql)
    }
}
