//! Entity metadata for relmap.
//!
//! Describes how in-memory objects map to storage tables:
//! - [`Entity`]: a named table with an ordered set of fields and a primary key
//! - [`Field`]: scalar, array, crypto and secret columns plus relation kinds
//! - [`Reference`], [`OneToMany`], [`ManyToMany`]: associations between entities,
//!   resolved lazily and cached
//! - [`EntityRegistry`]: the shared, name-keyed store that compiles entities
//!   on first use and generates many-to-many mediator entities
//! - [`ModelConfig`]: defaults loaded from TOML
//!
//! Fields are built with the `configure_*` methods from [`ConfigureField`],
//! [`ConfigureScalar`] and [`ConfigureRelation`]; import [`prelude`] to get
//! all three.

mod config;
mod entity;
mod error;
pub mod field;
pub mod relation;
mod registry;

pub use config::ModelConfig;
pub use entity::{Entity, EntityParams};
pub use error::{ModelError, ModelResult};
pub use field::{
    ArrayField, ConfigureField, ConfigureScalar, CryptoField, DataModifier, Field, ScalarField,
    ScalarType, SecretField, SerializationType,
};
pub use registry::EntityRegistry;
pub use relation::{
    CascadePolicy, ConfigureRelation, JoinCondition, ManyToMany, OneToMany, Reference,
};

/// Builder traits and the common field types.
pub mod prelude {
    pub use crate::field::{
        ArrayField, ConfigureField, ConfigureScalar, CryptoField, Field, ScalarField, ScalarType,
        SecretField,
    };
    pub use crate::relation::{
        CascadePolicy, ConfigureRelation, JoinCondition, ManyToMany, OneToMany, Reference,
    };
    pub use crate::{EntityParams, EntityRegistry, ModelConfig};
}
