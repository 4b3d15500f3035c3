//! Text-safe encoding for binary column values.

use crate::error::{CodecError, CodecResult};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Encodes raw bytes to standard base64.
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes standard base64 back into raw bytes.
pub fn decode(encoded: &str) -> CodecResult<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| CodecError::InvalidEncoding(format!("invalid base64: {e}")))
}
