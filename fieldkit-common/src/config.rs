//! Presentation configuration.
//!
//! Every setting has a default that reproduces the stock output, so an
//! empty JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default indentation added per nesting level by `ToStringBuilder`.
pub const DEFAULT_INDENT_SIZE: usize = 2;

/// Default separator placed between appended metadata fragments.
pub const DEFAULT_METADATA_SEPARATOR: &str = " & ";

/// Default rendering of an absent value.
pub const DEFAULT_NULL_TEXT: &str = "null";

/// Settings that control how registries and instances are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldsConfig {
    /// Spaces added per nesting level when printing nested values.
    pub indent_size: usize,
    /// Joiner used when metadata is appended to existing metadata.
    pub metadata_separator: String,
    /// Text printed for an absent value.
    pub null_text: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            indent_size: DEFAULT_INDENT_SIZE,
            metadata_separator: DEFAULT_METADATA_SEPARATOR.to_string(),
            null_text: DEFAULT_NULL_TEXT.to_string(),
        }
    }
}

impl FieldsConfig {
    /// Parse a configuration from JSON, filling unspecified keys with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FieldsConfig = serde_json::from_str(json)?;
        debug!(
            indent_size = config.indent_size,
            metadata_separator = %config.metadata_separator,
            "loaded fields configuration"
        );
        Ok(config)
    }
}
