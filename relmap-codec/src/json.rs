//! Compact JSON codec for structured values.

use crate::error::{CodecError, CodecResult};
use relmap_types::Value;

/// Encodes a value as compact JSON text (no extra whitespace).
///
/// Binary data, raw expressions and non-finite floats are rejected.
pub fn encode(value: &Value) -> CodecResult<String> {
    let json = value.to_json().map_err(|e| CodecError::Unrepresentable {
        format: "json",
        reason: e.to_string(),
    })?;
    Ok(serde_json::to_string(&json)?)
}

/// Decodes JSON text into a value.
pub fn decode(text: &str) -> CodecResult<Value> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(Value::from_json(json))
}
