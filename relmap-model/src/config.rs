//! Model-wide configuration.
//!
//! Read from a TOML file such as:
//!
//! ```toml
//! table_prefix = "app_"
//! secret_length = 32
//! array_serialization = "native"
//! ```
//!
//! Every key is optional. A missing, unreadable or malformed file falls back
//! to the defaults with a warning; use [`ModelConfig::from_toml_str`] when a
//! bad configuration should be an error instead.

use std::path::Path;

use relmap_codec::DEFAULT_SECRET_LENGTH;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ModelError, ModelResult};
use crate::field::SerializationType;

fn default_secret_length() -> usize {
    DEFAULT_SECRET_LENGTH
}

/// Defaults applied to entities and fields when they are compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Prepended to derived table names. Explicit table names are left alone.
    #[serde(default)]
    pub table_prefix: String,
    /// Byte length of generated secrets for fields without an explicit length.
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,
    /// Serialization for array fields that did not pick one.
    #[serde(default)]
    pub array_serialization: SerializationType,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            table_prefix: String::new(),
            secret_length: DEFAULT_SECRET_LENGTH,
            array_serialization: SerializationType::Json,
        }
    }
}

impl ModelConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> ModelResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a file, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No model config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(
                        table_prefix = %config.table_prefix,
                        secret_length = config.secret_length,
                        array_serialization = ?config.array_serialization,
                        "Loaded model config from {:?}", path
                    );
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse model config {:?}: {}. Falling back to defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read model config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Rejects values that no field could use.
    pub fn validate(&self) -> ModelResult<()> {
        if self.secret_length == 0 {
            return Err(ModelError::Config(
                "secret_length must be greater than zero".into(),
            ));
        }
        if self.array_serialization == SerializationType::Custom {
            return Err(ModelError::Config(
                "array_serialization must be `json` or `native`; custom callbacks are set per field"
                    .into(),
            ));
        }
        Ok(())
    }
}
