//! Error types for metadata building and field pipelines.

use relmap_codec::CodecError;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or using entity metadata.
///
/// Everything except `Codec` and `InvalidValue` is a configuration error:
/// it surfaces while entities are being defined and is not meant to be
/// recovered from at runtime.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No entity with this name is defined or compiled.
    #[error("entity `{0}` is not registered")]
    EntityNotFound(String),

    /// An entity with this name already exists in the registry.
    #[error("entity `{0}` is already registered")]
    DuplicateEntity(String),

    /// Two fields of one entity share a name.
    #[error("field `{field}` is defined twice in entity `{entity}`")]
    DuplicateField { entity: String, field: String },

    /// Lookup of a field that the entity does not have.
    #[error("field `{field}` not found in entity `{entity}`")]
    FieldNotFound { entity: String, field: String },

    /// The entity declares no primary-key field.
    #[error("primary key not found for entity `{0}`")]
    NoPrimaryKey(String),

    /// The field has not been compiled into an entity yet.
    #[error("field `{0}` is not attached to an entity")]
    Unbound(String),

    /// Join type token outside the supported set.
    #[error("unknown join type `{join_type}` in relation `{field}` to `{target}`")]
    UnknownJoinType {
        join_type: String,
        field: String,
        target: String,
    },

    /// A many-to-many relation needs a mediator table to generate its mediator entity.
    #[error(
        "table name for mediator entity of relation `{relation}` between `{owner}` and `{target}` was not found"
    )]
    MissingMediatorTable {
        relation: String,
        owner: String,
        target: String,
    },

    /// A one-to-many relation names a field that is not a reference back to its owner.
    #[error("relation `{relation}` expects `{target}.{field}` to be a reference to `{owner}`")]
    InvalidBackReference {
        relation: String,
        owner: String,
        target: String,
        field: String,
    },

    /// The value does not fit the field.
    #[error("invalid value for field `{field}`: {reason}")]
    InvalidValue { field: String, reason: String },

    /// Encoding or decoding failed inside a field pipeline.
    #[error("codec error in field `{field}`: {source}")]
    Codec {
        field: String,
        #[source]
        source: CodecError,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file is not valid TOML.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
