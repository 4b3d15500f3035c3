//! SQL predicate rendering for relmap.
//!
//! - [`Operator`]: the closed set of filter operators, each compiling a
//!   column fragment and an [`Operand`] into predicate text
//! - [`join`]: `ON` and `JOIN` clauses for reference and many-to-many relations
//!
//! Rendering is pure string work. Nothing here executes SQL.

pub mod join;
mod operand;
mod operator;

pub use operand::Operand;
pub use operator::Operator;

use relmap_model::ModelError;
use thiserror::Error;

/// Result type for query rendering.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while building predicates.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    #[error("{0} values cannot be rendered as SQL operands")]
    Unrenderable(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),
}
