//! Core type definitions for relmap.
//!
//! This crate defines the storage-agnostic types shared by every layer of
//! the mapper:
//! - [`Value`]: in-memory and storage-side values, including structured
//!   containers and raw SQL expressions
//! - [`SqlExpression`]: a raw storage expression that bypasses all escaping
//! - [`JoinType`]: the closed set of SQL join kinds a relation may use
//!
//! Field codecs, dialect helpers and operators live in their own crates and
//! only exchange data through these types.

mod expression;
mod join;
mod value;

pub use expression::SqlExpression;
pub use join::JoinType;
pub use value::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("value cannot be represented as JSON: {0}")]
    Unrepresentable(String),

    #[error("unknown join type `{0}`")]
    UnknownJoinType(String),
}
