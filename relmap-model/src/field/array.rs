//! Structured values stored in a single text column.

use std::fmt;
use std::sync::Arc;

use relmap_codec::{CodecError, CodecResult};
use relmap_db::SqlHelper;
use relmap_types::Value;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigureField, ConfigureScalar, Direction, FieldBase, ScalarField, ScalarType, ValueCodec};
use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};

/// Serializer for structured values.
pub type EncodeFn = Arc<dyn Fn(&Value) -> CodecResult<String> + Send + Sync>;

/// Inverse of [`EncodeFn`].
pub type DecodeFn = Arc<dyn Fn(&str) -> CodecResult<Value> + Send + Sync>;

/// How an [`ArrayField`] turns its value into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerializationType {
    #[default]
    Json,
    /// Compact binary form wrapped in base64.
    Native,
    /// Caller-supplied callbacks.
    Custom,
}

#[derive(Clone)]
struct ArrayCodec {
    kind: SerializationType,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl ArrayCodec {
    fn builtin(kind: SerializationType) -> Self {
        match kind {
            SerializationType::Native => Self {
                kind,
                encode: Arc::new(relmap_codec::native::encode),
                decode: Arc::new(relmap_codec::native::decode),
            },
            SerializationType::Json | SerializationType::Custom => Self {
                kind: SerializationType::Json,
                encode: Arc::new(relmap_codec::json::encode),
                decode: Arc::new(relmap_codec::json::decode),
            },
        }
    }
}

/// A list or map stored as encoded text.
///
/// The codec is picked with [`configure_serialization_json`],
/// [`configure_serialization_native`] or the custom callbacks. A field that
/// picks none uses the model's configured default once it is compiled, and
/// JSON before that.
///
/// [`configure_serialization_json`]: ArrayField::configure_serialization_json
/// [`configure_serialization_native`]: ArrayField::configure_serialization_native
#[derive(Clone)]
pub struct ArrayField {
    scalar: ScalarField,
    codec: Option<ArrayCodec>,
}

impl ArrayField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scalar: ScalarField::from_base(FieldBase::with_codec(name), ScalarType::Text),
            codec: None,
        }
    }

    pub fn base(&self) -> &FieldBase {
        self.scalar.base()
    }

    pub fn name(&self) -> &str {
        self.scalar.name()
    }

    pub fn scalar(&self) -> &ScalarField {
        &self.scalar
    }

    pub fn serialization_type(&self) -> SerializationType {
        self.codec
            .as_ref()
            .map_or(SerializationType::Json, |codec| codec.kind)
    }

    /// Whether a codec was chosen explicitly.
    pub fn has_explicit_serialization(&self) -> bool {
        self.codec.is_some()
    }

    pub fn configure_serialization_json(mut self) -> Self {
        self.codec = Some(ArrayCodec::builtin(SerializationType::Json));
        self
    }

    pub fn configure_serialization_native(mut self) -> Self {
        self.codec = Some(ArrayCodec::builtin(SerializationType::Native));
        self
    }

    /// Replaces the encoder. The decoder stays as it was (JSON if none was set).
    pub fn configure_serialize_callback<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Value) -> CodecResult<String> + Send + Sync + 'static,
    {
        let mut codec = self.take_codec();
        codec.kind = SerializationType::Custom;
        codec.encode = Arc::new(encode);
        self.codec = Some(codec);
        self
    }

    /// Replaces the decoder. The encoder stays as it was (JSON if none was set).
    pub fn configure_unserialize_callback<F>(mut self, decode: F) -> Self
    where
        F: Fn(&str) -> CodecResult<Value> + Send + Sync + 'static,
    {
        let mut codec = self.take_codec();
        codec.kind = SerializationType::Custom;
        codec.decode = Arc::new(decode);
        self.codec = Some(codec);
        self
    }

    fn take_codec(&mut self) -> ArrayCodec {
        self.codec
            .take()
            .unwrap_or_else(|| ArrayCodec::builtin(SerializationType::Json))
    }

    fn active_codec(&self) -> ArrayCodec {
        self.codec
            .clone()
            .unwrap_or_else(|| ArrayCodec::builtin(SerializationType::Json))
    }

    pub(crate) fn apply_config(&mut self, config: &ModelConfig) {
        if self.codec.is_none() {
            debug!(
                field = %self.name(),
                serialization = ?config.array_serialization,
                "array field uses configured serialization"
            );
            self.codec = Some(ArrayCodec::builtin(config.array_serialization));
        }
    }

    /// Serializes a structured value to text.
    pub fn encode_value(&self, value: &Value) -> ModelResult<String> {
        (self.active_codec().encode)(value).map_err(|source| self.codec_error(source))
    }

    /// Parses stored text. Empty text decodes to an empty list.
    ///
    /// The result is always a container (or an expression). A decoded null
    /// stays null only on nullable fields; a decoded scalar is an error.
    pub fn decode_value(&self, text: &str) -> ModelResult<Value> {
        if text.is_empty() {
            return Ok(Value::empty_list());
        }
        let decoded =
            (self.active_codec().decode)(text).map_err(|source| self.codec_error(source))?;
        match decoded {
            Value::List(_) | Value::Map(_) | Value::Expr(_) => Ok(decoded),
            Value::Null if self.base().is_nullable() => Ok(Value::Null),
            Value::Null => Ok(Value::empty_list()),
            other => Err(self.codec_error(CodecError::InvalidEncoding(format!(
                "stored array decodes to {}",
                other.type_name()
            )))),
        }
    }

    fn codec_error(&self, source: CodecError) -> ModelError {
        ModelError::Codec {
            field: self.name().to_string(),
            source,
        }
    }

    /// Coerces a value to a container.
    ///
    /// Nulls pass through on nullable fields and become an empty list
    /// otherwise. A lone scalar is wrapped in a one-element list.
    pub fn cast(&self, value: Value) -> Value {
        match value {
            Value::Null if self.base().is_nullable() => Value::Null,
            Value::Null => Value::empty_list(),
            Value::Expr(_) | Value::List(_) | Value::Map(_) => value,
            other => Value::List(vec![other]),
        }
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base().run(Direction::Save, value, Some(self))
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base().run(Direction::Fetch, value, Some(self))
    }

    /// Renders a value as a text literal, encoding it first if it is still structured.
    pub fn convert_value_to_db(&self, helper: &dyn SqlHelper, value: &Value) -> ModelResult<String> {
        match value {
            Value::Expr(expr) => Ok(expr.as_str().to_string()),
            Value::Null if self.base().is_nullable() => Ok("NULL".to_string()),
            Value::Text(text) => Ok(helper.convert_to_db_string(text)),
            other => {
                let text = self.encode_value(&self.cast(other.clone()))?;
                Ok(helper.convert_to_db_string(&text))
            }
        }
    }
}

impl ValueCodec for ArrayField {
    fn encode(&self, value: Value) -> ModelResult<Value> {
        match value {
            Value::Expr(_) => Ok(value),
            Value::Null if self.base().is_nullable() => Ok(Value::Null),
            other => Ok(Value::Text(self.encode_value(&self.cast(other))?)),
        }
    }

    fn decode(&self, value: Value) -> ModelResult<Value> {
        match value {
            Value::Expr(_) | Value::List(_) | Value::Map(_) => Ok(value),
            Value::Null if self.base().is_nullable() => Ok(Value::Null),
            Value::Null => Ok(Value::empty_list()),
            Value::Text(text) => self.decode_value(&text),
            Value::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(text) => self.decode_value(&text),
                Err(_) => Err(self.codec_error(CodecError::InvalidEncoding(
                    "stored array is not valid UTF-8".into(),
                ))),
            },
            other => Err(self.codec_error(CodecError::InvalidEncoding(format!(
                "expected encoded text, got {}",
                other.type_name()
            )))),
        }
    }
}

impl fmt::Debug for ArrayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayField")
            .field("scalar", &self.scalar)
            .field("serialization", &self.codec.as_ref().map(|codec| codec.kind))
            .finish()
    }
}

impl ConfigureField for ArrayField {
    fn base_mut(&mut self) -> &mut FieldBase {
        self.scalar.base_mut()
    }
}

impl ConfigureScalar for ArrayField {
    fn scalar_mut(&mut self) -> &mut ScalarField {
        &mut self.scalar
    }
}
