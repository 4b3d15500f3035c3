//! Plain column fields.

use relmap_db::SqlHelper;
use relmap_types::Value;
use serde::{Deserialize, Serialize};

use super::{ConfigureField, Direction, FieldBase};
use crate::error::{ModelError, ModelResult};

/// Storage type of a scalar column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    String,
    Text,
}

impl ScalarType {
    fn zero(self) -> Value {
        match self {
            Self::Integer => Value::Int(0),
            Self::Float => Value::Float(0.0),
            Self::Boolean => Value::Bool(false),
            Self::String | Self::Text => Value::Text(String::new()),
        }
    }

    fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }
}

/// A field stored in exactly one column.
#[derive(Debug, Clone)]
pub struct ScalarField {
    base: FieldBase,
    data_type: ScalarType,
    primary: bool,
    unique: bool,
    required: bool,
    autocomplete: bool,
    column_name: Option<String>,
}

impl ScalarField {
    pub fn new(name: impl Into<String>, data_type: ScalarType) -> Self {
        Self::from_base(FieldBase::new(name), data_type)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Boolean)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::String)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Text)
    }

    pub(crate) fn from_base(base: FieldBase, data_type: ScalarType) -> Self {
        Self {
            base,
            data_type,
            primary: false,
            unique: false,
            required: false,
            autocomplete: false,
            column_name: None,
        }
    }

    pub fn base(&self) -> &FieldBase {
        &self.base
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn data_type(&self) -> ScalarType {
        self.data_type
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_autocomplete(&self) -> bool {
        self.autocomplete
    }

    /// Column name; defaults to the field name.
    pub fn column_name(&self) -> &str {
        self.column_name.as_deref().unwrap_or_else(|| self.base.name())
    }

    /// Coerces a value to the column type.
    ///
    /// Nulls pass through on nullable fields and become the type's zero value
    /// otherwise. Text that does not parse as a number casts to zero.
    pub fn cast(&self, value: Value) -> Value {
        match value {
            Value::Expr(_) => value,
            Value::Null if self.base.is_nullable() => Value::Null,
            Value::Null => self.data_type.zero(),
            other => cast_to(self.data_type, other),
        }
    }

    pub fn save(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Save, value, None)
    }

    pub fn fetch(&self, value: Value) -> ModelResult<Value> {
        self.base.run(Direction::Fetch, value, None)
    }

    /// Renders a value as an SQL literal of the column type.
    pub fn convert_value_to_db(&self, helper: &dyn SqlHelper, value: &Value) -> ModelResult<String> {
        if let Value::Expr(expr) = value {
            return Ok(expr.as_str().to_string());
        }
        if value.is_null() && self.base.is_nullable() {
            return Ok("NULL".to_string());
        }
        match self.cast(value.clone()) {
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) if f.is_finite() => Ok(f.to_string()),
            Value::Bool(b) => Ok(if b { "1" } else { "0" }.to_string()),
            Value::Text(s) => Ok(helper.convert_to_db_string(&s)),
            other => Err(ModelError::InvalidValue {
                field: self.name().to_string(),
                reason: format!(
                    "{} value cannot be stored in a {:?} column",
                    other.type_name(),
                    self.data_type
                ),
            }),
        }
    }

    /// Normalizes a raw database value and casts it to the column type.
    pub fn convert_value_from_db(&self, helper: &dyn SqlHelper, value: Value) -> Value {
        self.cast(self.convert_raw_from_db(helper, value))
    }

    /// Helper conversion only, for kinds whose fetch chain decodes the raw value.
    pub(crate) fn convert_raw_from_db(&self, helper: &dyn SqlHelper, value: Value) -> Value {
        match value {
            Value::Text(s) => Value::Text(helper.convert_from_db_string(&s)),
            other => other,
        }
    }
}

fn cast_to(data_type: ScalarType, value: Value) -> Value {
    match (data_type, value) {
        (ScalarType::Integer, Value::Int(i)) => Value::Int(i),
        (ScalarType::Integer, Value::Float(f)) => Value::Int(f as i64),
        (ScalarType::Integer, Value::Bool(b)) => Value::Int(i64::from(b)),
        (ScalarType::Integer, Value::Text(s)) => Value::Int(parse_int(&s)),

        (ScalarType::Float, Value::Float(f)) => Value::Float(f),
        (ScalarType::Float, Value::Int(i)) => Value::Float(i as f64),
        (ScalarType::Float, Value::Bool(b)) => Value::Float(if b { 1.0 } else { 0.0 }),
        (ScalarType::Float, Value::Text(s)) => Value::Float(s.trim().parse().unwrap_or(0.0)),

        (ScalarType::Boolean, Value::Bool(b)) => Value::Bool(b),
        (ScalarType::Boolean, Value::Int(i)) => Value::Bool(i != 0),
        (ScalarType::Boolean, Value::Float(f)) => Value::Bool(f != 0.0),
        (ScalarType::Boolean, Value::Text(s)) => Value::Bool(parse_bool(&s)),

        (t, Value::Text(s)) if t.is_textual() => Value::Text(s),
        (t, Value::Int(i)) if t.is_textual() => Value::Text(i.to_string()),
        (t, Value::Float(f)) if t.is_textual() => Value::Text(f.to_string()),
        (t, Value::Bool(b)) if t.is_textual() => Value::Text(if b { "1" } else { "0" }.into()),

        (t, Value::Bytes(bytes)) => match String::from_utf8(bytes) {
            Ok(s) => cast_to(t, Value::Text(s)),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        // Containers have no scalar form; rendering reports them.
        (_, other) => other,
    }
}

fn parse_int(s: &str) -> i64 {
    let s = s.trim();
    s.parse::<i64>()
        .or_else(|_| s.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "y" | "yes" | "true" | "on"
    )
}

impl ConfigureField for ScalarField {
    fn base_mut(&mut self) -> &mut FieldBase {
        &mut self.base
    }
}

/// Builder methods for kinds stored in a column.
pub trait ConfigureScalar: ConfigureField {
    #[doc(hidden)]
    fn scalar_mut(&mut self) -> &mut ScalarField;

    fn configure_primary(mut self, primary: bool) -> Self {
        self.scalar_mut().primary = primary;
        self
    }

    fn configure_unique(mut self, unique: bool) -> Self {
        self.scalar_mut().unique = unique;
        self
    }

    fn configure_required(mut self, required: bool) -> Self {
        self.scalar_mut().required = required;
        self
    }

    fn configure_autocomplete(mut self, autocomplete: bool) -> Self {
        self.scalar_mut().autocomplete = autocomplete;
        self
    }

    fn configure_column_name(mut self, column_name: impl Into<String>) -> Self {
        self.scalar_mut().column_name = Some(column_name.into());
        self
    }
}

impl ConfigureScalar for ScalarField {
    fn scalar_mut(&mut self) -> &mut ScalarField {
        self
    }
}
