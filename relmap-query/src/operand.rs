//! Value side of a predicate.

use std::fmt;

use relmap_db::SqlHelper;
use relmap_types::Value;

use crate::{QueryError, QueryResult};

/// Already-rendered SQL for the value side of an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// The null marker. `=` and `<>` turn it into `IS [NOT] NULL`.
    Null,
    /// One SQL fragment: a literal, a column or a subquery.
    Sql(String),
    /// Several fragments, for `in` and `between`.
    List(Vec<String>),
}

impl Operand {
    pub fn sql(fragment: impl Into<String>) -> Self {
        Self::Sql(fragment.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Bounds for `between`.
    pub fn range(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self::List(vec![low.into(), high.into()])
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Renders a value with the dialect's literal rules.
    ///
    /// Lists render item by item. Maps and raw bytes have no literal form.
    pub fn from_value(helper: &dyn SqlHelper, value: &Value) -> QueryResult<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::List(items) => items
                .iter()
                .map(|item| literal(helper, item))
                .collect::<QueryResult<Vec<_>>>()
                .map(Self::List),
            other => literal(helper, other).map(Self::Sql),
        }
    }

    /// Fragments in order; a single fragment is a one-item list.
    pub(crate) fn items(&self) -> Vec<&str> {
        match self {
            Self::Null => vec!["NULL"],
            Self::Sql(fragment) => vec![fragment.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

fn literal(helper: &dyn SqlHelper, value: &Value) -> QueryResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) if f.is_finite() => Ok(f.to_string()),
        Value::Text(s) => Ok(helper.convert_to_db_string(s)),
        Value::Expr(expr) => Ok(expr.as_str().to_string()),
        other => Err(QueryError::Unrenderable(other.type_name())),
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.items().join(", "))
    }
}

impl From<&str> for Operand {
    fn from(fragment: &str) -> Self {
        Self::Sql(fragment.to_string())
    }
}

impl From<String> for Operand {
    fn from(fragment: String) -> Self {
        Self::Sql(fragment)
    }
}
