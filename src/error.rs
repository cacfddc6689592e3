//! Codec error types.
//!
//! Every failure raised while turning values into GraphBinary bytes (or
//! bytes back into values) is one of these variants. Errors are returned
//! to the caller; the codec never retries and holds no state to roll back.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// GraphBinary codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A bytecode request carried something other than bytecode under `"gremlin"`.
    #[error("No serializer found for argument of type '{0}'")]
    NoSerializerForArgument(String),

    /// No encoder is registered for the value's runtime type.
    #[error("Unsupported type for serialization: {0}")]
    UnsupportedType(String),

    /// Fewer bytes remain than a declared length requires.
    #[error("Truncated buffer: needed {needed} bytes, {remaining} remaining")]
    TruncatedBuffer {
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        remaining: usize,
    },

    /// Tag byte not present in the registry.
    #[error("Unknown type tag: 0x{0:02X}")]
    UnknownTag(u8),

    /// A string-keyed map carried a key of another type.
    #[error("Map key must be a string, found type tag 0x{0:02X}")]
    InvalidMapKey(u8),

    /// A map key was null (flagged null on the wire, or `Value::Null` on encode).
    #[error("Map key must not be null")]
    NullKeyForbidden,

    /// String bytes were not valid UTF-8.
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(String),

    /// Payload bytes were well-sized but semantically malformed.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A length does not fit the wire prefix or exceeds the configured limit.
    #[error("{0} too large: {1}")]
    ValueTooLarge(&'static str, usize),

    /// Values nest deeper than the configured limit.
    #[error("Nesting depth exceeds limit of {0}")]
    DepthExceeded(usize),

    /// Two registry entries claim the same tag.
    #[error("Type tag 0x{0:02X} is already registered")]
    DuplicateTag(u8),

    /// Two registry entries claim the same extension type name.
    #[error("Extension type '{0}' is already registered")]
    DuplicateTypeName(String),
}

impl CodecError {
    /// Create a truncation error.
    pub fn truncated(needed: usize, remaining: usize) -> Self {
        Self::TruncatedBuffer { needed, remaining }
    }

    /// Create an invalid value error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// True for errors raised while reading bytes.
    ///
    /// `ValueTooLarge` is both: the decoder raises it for declared lengths
    /// over the limit, the encoder for lengths that overflow a prefix.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CodecError::TruncatedBuffer { .. }
                | CodecError::ValueTooLarge(..)
                | CodecError::DepthExceeded(_)
                | CodecError::UnknownTag(_)
                | CodecError::InvalidMapKey(_)
                | CodecError::NullKeyForbidden
                | CodecError::InvalidUtf8(_)
                | CodecError::InvalidValue(_)
        )
    }

    /// True for errors raised while producing bytes.
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self,
            CodecError::NoSerializerForArgument(_)
                | CodecError::UnsupportedType(_)
                | CodecError::ValueTooLarge(..)
                | CodecError::NullKeyForbidden
        )
    }
}
