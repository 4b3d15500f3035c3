//! Legacy whole-value serialization.
//!
//! The value is serialized with bincode and the bytes are rendered as
//! standard base64 so they fit a text column. The format is opaque and only
//! this module reads it back. Unlike [`json`](crate::json) it preserves every
//! [`Value`] variant, binary data included.

use crate::error::{CodecError, CodecResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use relmap_types::Value;

/// Serializes a value to native text.
pub fn encode(value: &Value) -> CodecResult<String> {
    let bytes = bincode::serialize(value)?;
    Ok(STANDARD.encode(bytes))
}

/// Restores a value from native text.
pub fn decode(text: &str) -> CodecResult<Value> {
    let bytes = STANDARD
        .decode(text)
        .map_err(|e| CodecError::InvalidEncoding(format!("invalid base64: {e}")))?;
    Ok(bincode::deserialize(&bytes)?)
}
