//! Serializer configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};
use crate::graphbinary::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH};

/// MIME type announced in the request header.
pub const GRAPHBINARY_MIME_TYPE: &str = "application/vnd.graphbinary-v1.0";

/// Protocol version byte written after the MIME header.
pub const GRAPHBINARY_VERSION: u8 = 0x81;

// ============================================================================
// SerializerConfig
// ============================================================================

/// Message serializer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// MIME type written before every request
    pub mime_type: String,
    /// Protocol version byte
    pub version: u8,
    /// Largest element or byte count accepted while decoding
    pub max_collection_length: usize,
    /// Deepest value nesting accepted while decoding
    pub max_nesting_depth: usize,
}

impl SerializerConfig {
    /// Start a builder from the defaults.
    pub fn builder() -> SerializerConfigBuilder {
        SerializerConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check that the MIME type fits its one-byte length prefix.
    pub fn validate(&self) -> CodecResult<()> {
        let len = self.mime_type.len();
        if len > u8::MAX as usize {
            return Err(CodecError::ValueTooLarge("mime type", len));
        }
        Ok(())
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            mime_type: GRAPHBINARY_MIME_TYPE.to_string(),
            version: GRAPHBINARY_VERSION,
            max_collection_length: DEFAULT_MAX_LENGTH,
            max_nesting_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// SerializerConfigBuilder
// ============================================================================

/// Builder for [`SerializerConfig`].
pub struct SerializerConfigBuilder {
    config: SerializerConfig,
}

impl SerializerConfigBuilder {
    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.config.mime_type = mime_type.into();
        self
    }

    /// Set the protocol version byte.
    pub fn with_version(mut self, version: u8) -> Self {
        self.config.version = version;
        self
    }

    /// Set the decode length limit.
    pub fn with_max_collection_length(mut self, max: usize) -> Self {
        self.config.max_collection_length = max;
        self
    }

    /// Set the decode nesting limit.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }

    /// Validate and build.
    pub fn build(self) -> CodecResult<SerializerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
