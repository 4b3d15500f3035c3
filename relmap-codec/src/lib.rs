//! Value codecs used by relmap's field pipelines.
//!
//! Every codec is a pure encode/decode pair between an in-memory [`Value`]
//! and the text that ends up in a storage column:
//! - [`json`]: compact JSON for structured containers (array fields)
//! - [`native`]: legacy whole-value serialization, opaque to the database
//! - [`text_safe`]: standard base64 for binary values (crypto/secret fields)
//! - [`secret`]: random bytes used as generated secret defaults
//!
//! Nothing here encrypts. `text_safe` only makes binary data safe to store in
//! a text column.
//!
//! [`Value`]: relmap_types::Value

mod error;
pub mod json;
pub mod native;
pub mod secret;
pub mod text_safe;

pub use error::{CodecError, CodecResult};
pub use secret::{random_bytes, DEFAULT_SECRET_LENGTH};
