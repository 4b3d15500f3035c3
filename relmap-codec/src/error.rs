//! Error types for the codec layer.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a value.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value has no representation in the selected format.
    #[error("value cannot be encoded as {format}: {reason}")]
    Unrepresentable { format: &'static str, reason: String },

    /// JSON text could not be produced or parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Native serialization failed.
    #[error("native serialization error: {0}")]
    Native(#[from] bincode::Error),

    /// Stored text is not valid for the codec (bad base64 and the like).
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
