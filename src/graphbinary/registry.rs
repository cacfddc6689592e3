//! Type registry: the single table mapping values to tags and encoders,
//! and tags back to decoders.
//!
//! Built-in types are resolved through [`Value::data_type`]; provider
//! extensions are registered by name at construction time. A registry is
//! never mutated once built, so one instance can be shared by any number of
//! concurrent encode/decode calls without locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use super::data_type::DataType;
use super::decoder::{decode_builtin, decode_extension, GraphBinaryReader};
use super::encoder::{encode_builtin, encode_extension, GraphBinaryWriter};
use super::types::Value;
use crate::error::{CodecError, CodecResult};

/// Writes the payload of a value (after tag and flag).
pub type EncodeFn = fn(&mut GraphBinaryWriter<'_>, &Value) -> CodecResult<()>;

/// Reads the payload for the given tag (after the flag).
pub type DecodeFn = fn(&mut GraphBinaryReader<'_>, u8) -> CodecResult<Value>;

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Read-only tag <-> codec lookup table.
#[derive(Clone)]
pub struct TypeRegistry {
    decoders: HashMap<u8, DecodeFn>,
    extension_tags: HashMap<String, u8>,
    extension_names: HashMap<u8, String>,
}

impl TypeRegistry {
    /// Registry with the built-in types only.
    pub fn new() -> Self {
        let decoders = DataType::ALL
            .iter()
            .map(|dt| (dt.tag(), decode_builtin as DecodeFn))
            .collect();
        Self {
            decoders,
            extension_tags: HashMap::new(),
            extension_names: HashMap::new(),
        }
    }

    /// Start building a registry with extension types.
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder {
            extensions: Vec::new(),
        }
    }

    /// Process-wide built-in registry, created on first use.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    /// Find the tag and payload encoder for a value.
    ///
    /// Fails with `UnsupportedType` carrying the value's type name when the
    /// value is an extension nobody registered, or pre-encoded bytes (which
    /// have no tag of their own).
    pub fn resolve_encoder(&self, value: &Value) -> CodecResult<(u8, EncodeFn)> {
        if let Some(dt) = value.data_type() {
            return Ok((dt.tag(), encode_builtin as EncodeFn));
        }
        match value {
            Value::Extension(ext) => self
                .extension_tags
                .get(&ext.type_name)
                .map(|tag| (*tag, encode_extension as EncodeFn))
                .ok_or_else(|| CodecError::UnsupportedType(ext.type_name.clone())),
            other => Err(CodecError::UnsupportedType(other.type_name().to_string())),
        }
    }

    /// Find the payload decoder for a tag byte.
    pub fn resolve_decoder(&self, tag: u8) -> CodecResult<DecodeFn> {
        self.decoders
            .get(&tag)
            .copied()
            .ok_or(CodecError::UnknownTag(tag))
    }

    /// Name of the extension registered under `tag`.
    pub fn extension_name(&self, tag: u8) -> Option<&str> {
        self.extension_names.get(&tag).map(String::as_str)
    }

    /// Number of tags this registry can decode.
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Check if no tags are registered.
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<u8> = self.decoders.keys().copied().collect();
        tags.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("tags", &tags)
            .field("extensions", &self.extension_tags)
            .finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for registries carrying extension types.
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    extensions: Vec<(String, u8)>,
}

impl TypeRegistryBuilder {
    /// Register `type_name` under `tag`.
    pub fn register_extension(mut self, type_name: impl Into<String>, tag: u8) -> Self {
        self.extensions.push((type_name.into(), tag));
        self
    }

    /// Build the registry. Fails if a tag collides with a built-in type or
    /// another extension, or if a type name is registered twice.
    pub fn build(self) -> CodecResult<TypeRegistry> {
        let mut registry = TypeRegistry::new();
        for (name, tag) in self.extensions {
            if registry.decoders.contains_key(&tag) {
                return Err(CodecError::DuplicateTag(tag));
            }
            if registry.extension_tags.contains_key(&name) {
                return Err(CodecError::DuplicateTypeName(name));
            }
            registry.decoders.insert(tag, decode_extension as DecodeFn);
            registry.extension_tags.insert(name.clone(), tag);
            registry.extension_names.insert(tag, name);
        }
        Ok(registry)
    }
}
