//! Field definitions.
//!
//! A [`Field`] is one named attribute of an entity. Scalar-like kinds map to
//! a single column; relation kinds describe how entities link together.
//!
//! Every field owns two ordered modifier chains. Values written to storage
//! run through the save chain, values read back run through the fetch chain.
//! Kinds with a codec ([`ArrayField`], [`CryptoField`], [`SecretField`])
//! install [`DataModifier::Codec`] at the head of both chains, so custom
//! modifiers added later always see the encoded form on save and the
//! decoded form on fetch.

mod array;
mod crypto;
mod scalar;

use std::fmt;
use std::sync::Arc;

use relmap_db::SqlHelper;
use relmap_types::Value;

use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::relation::{ManyToMany, OneToMany, Reference, RelationBase};

pub use array::{ArrayField, DecodeFn, EncodeFn, SerializationType};
pub use crypto::{CryptoField, SecretField};
pub use scalar::{ConfigureScalar, ScalarField, ScalarType};

/// A user transformation applied to a value in a modifier chain.
pub type ModifierFn = Arc<dyn Fn(Value) -> ModelResult<Value> + Send + Sync>;

/// Produces a default value on demand.
pub type DefaultProvider = Arc<dyn Fn() -> Value + Send + Sync>;

/// One step of a save or fetch chain.
#[derive(Clone)]
pub enum DataModifier {
    /// The field kind's own codec. Encodes on save, decodes on fetch.
    Codec,
    /// A caller-supplied transformation.
    Custom(ModifierFn),
}

impl DataModifier {
    pub fn custom<F>(modifier: F) -> Self
    where
        F: Fn(Value) -> ModelResult<Value> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(modifier))
    }
}

impl fmt::Debug for DataModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec => f.write_str("Codec"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Default value of a field: fixed, or computed each time it is requested.
#[derive(Clone)]
pub enum DefaultValue {
    Static(Value),
    Provider(DefaultProvider),
}

impl DefaultValue {
    pub fn resolve(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Provider(provider) => provider(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Encodes values into their stored form and back.
pub trait ValueCodec {
    fn encode(&self, value: Value) -> ModelResult<Value>;
    fn decode(&self, value: Value) -> ModelResult<Value>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Save,
    Fetch,
}

/// State shared by every field kind.
#[derive(Clone)]
pub struct FieldBase {
    name: String,
    nullable: bool,
    default_value: Option<DefaultValue>,
    save_modifiers: Vec<DataModifier>,
    fetch_modifiers: Vec<DataModifier>,
    entity_name: Option<String>,
}

impl FieldBase {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            default_value: None,
            save_modifiers: Vec::new(),
            fetch_modifiers: Vec::new(),
            entity_name: None,
        }
    }

    /// Base whose chains start with the codec slot.
    pub(crate) fn with_codec(name: impl Into<String>) -> Self {
        let mut base = Self::new(name);
        base.save_modifiers.push(DataModifier::Codec);
        base.fetch_modifiers.push(DataModifier::Codec);
        base
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Name of the entity this field was compiled into.
    pub fn entity_name(&self) -> Option<&str> {
        self.entity_name.as_deref()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn default_value(&self) -> Option<Value> {
        self.default_value.as_ref().map(DefaultValue::resolve)
    }

    pub fn save_modifiers(&self) -> &[DataModifier] {
        &self.save_modifiers
    }

    pub fn fetch_modifiers(&self) -> &[DataModifier] {
        &self.fetch_modifiers
    }

    pub(crate) fn bind(&mut self, entity: &str) {
        self.entity_name = Some(entity.to_string());
    }

    pub(crate) fn bound_entity(&self) -> ModelResult<&str> {
        self.entity_name
            .as_deref()
            .ok_or_else(|| ModelError::Unbound(self.name.clone()))
    }

    pub(crate) fn run(
        &self,
        direction: Direction,
        mut value: Value,
        codec: Option<&dyn ValueCodec>,
    ) -> ModelResult<Value> {
        let chain = match direction {
            Direction::Save => &self.save_modifiers,
            Direction::Fetch => &self.fetch_modifiers,
        };
        for modifier in chain {
            value = match (modifier, codec) {
                (DataModifier::Codec, Some(codec)) => match direction {
                    Direction::Save => codec.encode(value)?,
                    Direction::Fetch => codec.decode(value)?,
                },
                (DataModifier::Codec, None) => value,
                (DataModifier::Custom(f), _) => f(value)?,
            };
        }
        Ok(value)
    }
}

impl fmt::Debug for FieldBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBase")
            .field("name", &self.name)
            .field("nullable", &self.nullable)
            .field("default_value", &self.default_value)
            .field("save_modifiers", &self.save_modifiers)
            .field("fetch_modifiers", &self.fetch_modifiers)
            .field("entity_name", &self.entity_name)
            .finish()
    }
}

/// Builder methods available on every field kind.
///
/// Configure fields before they are handed to an entity; compiled entities
/// are shared and never mutated.
pub trait ConfigureField: Sized {
    #[doc(hidden)]
    fn base_mut(&mut self) -> &mut FieldBase;

    fn configure_nullable(mut self, nullable: bool) -> Self {
        self.base_mut().nullable = nullable;
        self
    }

    fn configure_default_value(mut self, value: impl Into<Value>) -> Self {
        self.base_mut().default_value = Some(DefaultValue::Static(value.into()));
        self
    }

    fn configure_default_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.base_mut().default_value = Some(DefaultValue::Provider(Arc::new(provider)));
        self
    }

    /// Appends a modifier to the save chain.
    fn add_save_data_modifier<F>(mut self, modifier: F) -> Self
    where
        F: Fn(Value) -> ModelResult<Value> + Send + Sync + 'static,
    {
        self.base_mut()
            .save_modifiers
            .push(DataModifier::custom(modifier));
        self
    }

    /// Appends a modifier to the fetch chain.
    fn add_fetch_data_modifier<F>(mut self, modifier: F) -> Self
    where
        F: Fn(Value) -> ModelResult<Value> + Send + Sync + 'static,
    {
        self.base_mut()
            .fetch_modifiers
            .push(DataModifier::custom(modifier));
        self
    }
}

/// Any field an entity can hold.
#[derive(Debug)]
pub enum Field {
    Scalar(ScalarField),
    Array(ArrayField),
    Crypto(CryptoField),
    Secret(SecretField),
    Reference(Reference),
    OneToMany(OneToMany),
    ManyToMany(ManyToMany),
}

impl Field {
    pub fn base(&self) -> &FieldBase {
        match self {
            Self::Scalar(f) => f.base(),
            Self::Array(f) => f.base(),
            Self::Crypto(f) => f.base(),
            Self::Secret(f) => f.base(),
            Self::Reference(f) => f.base(),
            Self::OneToMany(f) => f.base(),
            Self::ManyToMany(f) => f.base(),
        }
    }

    fn base_mut(&mut self) -> &mut FieldBase {
        match self {
            Self::Scalar(f) => f.base_mut(),
            Self::Array(f) => f.base_mut(),
            Self::Crypto(f) => f.base_mut(),
            Self::Secret(f) => f.base_mut(),
            Self::Reference(f) => f.base_mut(),
            Self::OneToMany(f) => f.base_mut(),
            Self::ManyToMany(f) => f.base_mut(),
        }
    }

    pub fn name(&self) -> &str {
        self.base().name()
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Crypto(_) => "crypto",
            Self::Secret(_) => "secret",
            Self::Reference(_) => "reference",
            Self::OneToMany(_) => "one_to_many",
            Self::ManyToMany(_) => "many_to_many",
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.base().is_nullable()
    }

    pub fn entity_name(&self) -> Option<&str> {
        self.base().entity_name()
    }

    /// Column-level attributes, for every kind that maps to a column.
    pub fn as_scalar(&self) -> Option<&ScalarField> {
        match self {
            Self::Scalar(f) => Some(f),
            Self::Array(f) => Some(f.scalar()),
            Self::Crypto(f) => Some(f.scalar()),
            Self::Secret(f) => Some(f.crypto().scalar()),
            _ => None,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.as_scalar().is_some_and(ScalarField::is_primary)
    }

    pub fn column_name(&self) -> Option<&str> {
        self.as_scalar().map(ScalarField::column_name)
    }

    pub fn is_relation(&self) -> bool {
        self.relation().is_some()
    }

    pub fn relation(&self) -> Option<&RelationBase> {
        match self {
            Self::Reference(f) => Some(f.relation()),
            Self::OneToMany(f) => Some(f.relation()),
            Self::ManyToMany(f) => Some(f.relation()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayField> {
        match self {
            Self::Array(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_secret(&self) -> Option<&SecretField> {
        match self {
            Self::Secret(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_one_to_many(&self) -> Option<&OneToMany> {
        match self {
            Self::OneToMany(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_many_to_many(&self) -> Option<&ManyToMany> {
        match self {
            Self::ManyToMany(f) => Some(f),
            _ => None,
        }
    }

    pub fn default_value(&self) -> Option<Value> {
        match self {
            Self::Secret(f) => Some(f.default_value()),
            other => other.base().default_value(),
        }
    }

    /// Coerces an in-memory value to the field's representation.
    pub fn cast(&self, value: Value) -> Value {
        match self {
            Self::Scalar(f) => f.cast(value),
            Self::Array(f) => f.cast(value),
            Self::Crypto(f) => f.cast(value),
            Self::Secret(f) => f.crypto().cast(value),
            _ => value,
        }
    }

    /// Runs the save chain.
    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.run(Direction::Save, value)
    }

    /// Runs the fetch chain.
    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.run(Direction::Fetch, value)
    }

    fn run(&self, direction: Direction, value: Value) -> ModelResult<Value> {
        let codec: Option<&dyn ValueCodec> = match self {
            Self::Array(f) => Some(f),
            Self::Crypto(f) => Some(f),
            Self::Secret(f) => Some(f.crypto()),
            _ => None,
        };
        self.base().run(direction, value, codec)
    }

    /// Renders a value as an SQL literal for this field's column.
    pub fn convert_value_to_db(&self, helper: &dyn SqlHelper, value: &Value) -> ModelResult<String> {
        match self {
            Self::Scalar(f) => f.convert_value_to_db(helper, value),
            Self::Array(f) => f.convert_value_to_db(helper, value),
            Self::Crypto(f) => f.convert_value_to_db(helper, value),
            Self::Secret(f) => f.crypto().convert_value_to_db(helper, value),
            _ => Err(ModelError::InvalidValue {
                field: self.name().to_string(),
                reason: format!("{} fields have no column", self.kind_name()),
            }),
        }
    }

    /// Normalizes a raw value read from the database.
    pub fn convert_value_from_db(&self, helper: &dyn SqlHelper, value: Value) -> Value {
        match self {
            Self::Scalar(f) => f.convert_value_from_db(helper, value),
            Self::Array(f) => f.scalar().convert_raw_from_db(helper, value),
            Self::Crypto(f) => f.scalar().convert_raw_from_db(helper, value),
            Self::Secret(f) => f.crypto().scalar().convert_raw_from_db(helper, value),
            _ => value,
        }
    }

    pub(crate) fn bind(&mut self, entity: &str) {
        self.base_mut().bind(entity);
    }

    pub(crate) fn apply_config(&mut self, config: &ModelConfig) {
        match self {
            Self::Array(f) => f.apply_config(config),
            Self::Secret(f) => f.apply_config(config),
            _ => {}
        }
    }

    /// A fresh primary-key field of the same kind under a new name.
    ///
    /// Modifiers, defaults and flags other than `primary` are not copied.
    pub(crate) fn blank_copy(&self, name: &str) -> Option<Field> {
        let copy = match self {
            Self::Scalar(f) => {
                Field::Scalar(ScalarField::new(name, f.data_type()).configure_primary(true))
            }
            Self::Array(_) => Field::Array(ArrayField::new(name).configure_primary(true)),
            Self::Crypto(_) => Field::Crypto(CryptoField::new(name).configure_primary(true)),
            Self::Secret(_) => Field::Secret(SecretField::new(name).configure_primary(true)),
            _ => return None,
        };
        Some(copy)
    }
}

impl From<ScalarField> for Field {
    fn from(f: ScalarField) -> Self {
        Self::Scalar(f)
    }
}

impl From<ArrayField> for Field {
    fn from(f: ArrayField) -> Self {
        Self::Array(f)
    }
}

impl From<CryptoField> for Field {
    fn from(f: CryptoField) -> Self {
        Self::Crypto(f)
    }
}

impl From<SecretField> for Field {
    fn from(f: SecretField) -> Self {
        Self::Secret(f)
    }
}

impl From<Reference> for Field {
    fn from(f: Reference) -> Self {
        Self::Reference(f)
    }
}

impl From<OneToMany> for Field {
    fn from(f: OneToMany) -> Self {
        Self::OneToMany(f)
    }
}

impl From<ManyToMany> for Field {
    fn from(f: ManyToMany) -> Self {
        Self::ManyToMany(f)
    }
}
