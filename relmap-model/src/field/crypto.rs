//! Binary fields stored as text-safe strings.

use relmap_codec::{random_bytes, text_safe, CodecError, DEFAULT_SECRET_LENGTH};
use relmap_db::SqlHelper;
use relmap_types::Value;

use super::{ConfigureField, ConfigureScalar, Direction, FieldBase, ScalarField, ScalarType, ValueCodec};
use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};

/// Raw bytes in memory, base64 text in storage.
#[derive(Debug, Clone)]
pub struct CryptoField {
    scalar: ScalarField,
}

impl CryptoField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scalar: ScalarField::from_base(FieldBase::with_codec(name), ScalarType::Text),
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

    fn codec_error(&self, source: CodecError) -> ModelError {
        ModelError::Codec {
            field: self.name().to_string(),
            source,
        }
    }

    /// Text becomes its UTF-8 bytes; other scalars their text form's bytes.
    pub fn cast(&self, value: Value) -> Value {
        match value {
            Value::Null if self.base().is_nullable() => Value::Null,
            Value::Null => Value::Bytes(Vec::new()),
            Value::Expr(_) | Value::Bytes(_) => value,
            Value::Text(s) => Value::Bytes(s.into_bytes()),
            Value::Int(i) => Value::Bytes(i.to_string().into_bytes()),
            Value::Float(f) => Value::Bytes(f.to_string().into_bytes()),
            Value::Bool(b) => Value::Bytes(vec![if b { b'1' } else { b'0' }]),
            other => other,
        }
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base().run(Direction::Save, value, Some(self))
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base().run(Direction::Fetch, value, Some(self))
    }

    /// Renders the encoded form as a text literal. Bytes are encoded first.
    pub fn convert_value_to_db(&self, helper: &dyn SqlHelper, value: &Value) -> ModelResult<String> {
        match value {
            Value::Expr(expr) => Ok(expr.as_str().to_string()),
            Value::Null if self.base().is_nullable() => Ok("NULL".to_string()),
            Value::Text(text) => Ok(helper.convert_to_db_string(text)),
            other => match self.encode(other.clone())? {
                Value::Text(text) => Ok(helper.convert_to_db_string(&text)),
                _ => Ok("NULL".to_string()),
            },
        }
    }
}

impl ValueCodec for CryptoField {
    fn encode(&self, value: Value) -> ModelResult<Value> {
        match self.cast(value) {
            Value::Bytes(bytes) => Ok(Value::Text(text_safe::encode(&bytes))),
            Value::Null => Ok(Value::Null),
            Value::Expr(expr) => Ok(Value::Expr(expr)),
            other => Err(self.codec_error(CodecError::Unrepresentable {
                format: "base64",
                reason: format!("{} is not binary data", other.type_name()),
            })),
        }
    }

    fn decode(&self, value: Value) -> ModelResult<Value> {
        match value {
            Value::Null | Value::Expr(_) => Ok(value),
            Value::Text(text) => text_safe::decode(&text)
                .map(Value::Bytes)
                .map_err(|source| self.codec_error(source)),
            Value::Bytes(raw) => {
                let text = String::from_utf8(raw).map_err(|_| {
                    self.codec_error(CodecError::InvalidEncoding(
                        "stored value is not valid UTF-8".into(),
                    ))
                })?;
                text_safe::decode(&text)
                    .map(Value::Bytes)
                    .map_err(|source| self.codec_error(source))
            }
            other => Err(self.codec_error(CodecError::InvalidEncoding(format!(
                "expected base64 text, got {}",
                other.type_name()
            )))),
        }
    }
}

impl ConfigureField for CryptoField {
    fn base_mut(&mut self) -> &mut FieldBase {
        self.scalar.base_mut()
    }
}

impl ConfigureScalar for CryptoField {
    fn scalar_mut(&mut self) -> &mut ScalarField {
        &mut self.scalar
    }
}

/// A crypto field whose default is freshly generated random bytes.
///
/// The length comes from [`configure_secret_length`](SecretField::configure_secret_length),
/// else from the model configuration, else [`DEFAULT_SECRET_LENGTH`].
#[derive(Debug, Clone)]
pub struct SecretField {
    crypto: CryptoField,
    secret_length: Option<usize>,
}

impl SecretField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            crypto: CryptoField::new(name),
            secret_length: None,
        }
    }

    pub fn base(&self) -> &FieldBase {
        self.crypto.base()
    }

    pub fn name(&self) -> &str {
        self.crypto.name()
    }

    pub fn crypto(&self) -> &CryptoField {
        &self.crypto
    }

    pub fn secret_length(&self) -> usize {
        self.secret_length.unwrap_or(DEFAULT_SECRET_LENGTH)
    }

    /// Sets the generated length. Zero is ignored.
    pub fn configure_secret_length(mut self, length: usize) -> Self {
        if length > 0 {
            self.secret_length = Some(length);
        }
        self
    }

    /// An explicitly configured default, or new random bytes on every call.
    pub fn default_value(&self) -> Value {
        self.base()
            .default_value()
            .unwrap_or_else(|| Value::Bytes(random_bytes(self.secret_length())))
    }

    pub(crate) fn apply_config(&mut self, config: &ModelConfig) {
        if self.secret_length.is_none() && config.secret_length > 0 {
            self.secret_length = Some(config.secret_length);
        }
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.crypto.save(value)
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.crypto.fetch(value)
    }
}

impl ConfigureField for SecretField {
    fn base_mut(&mut self) -> &mut FieldBase {
        self.crypto.base_mut()
    }
}

impl ConfigureScalar for SecretField {
    fn scalar_mut(&mut self) -> &mut ScalarField {
        &mut self.crypto.scalar
    }
}
