//! GraphBinary decoder.

use std::collections::HashMap;

use bytes::{Buf, Bytes};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;
use uuid::Uuid;

use super::data_type::{DataType, EnumKind, VALUE_PRESENT};
use super::registry::TypeRegistry;
use super::types::{
    BigDecimal, BigInteger, Binding, Bytecode, Edge, EnumValue, ExtensionValue, Instruction,
    Path, Predicate, Property, Traverser, Value, Vertex, VertexProperty,
};
use crate::error::{CodecError, CodecResult};

/// Default upper bound on any declared element or byte count.
pub const DEFAULT_MAX_LENGTH: usize = 16 * 1024 * 1024;

/// Default upper bound on how deeply values may nest.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// GraphBinary decoder that reads values from a byte slice.
pub struct GraphBinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
    registry: &'a TypeRegistry,
    max_length: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> GraphBinaryReader<'a> {
    /// Create a reader over the global registry.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_registry(data, TypeRegistry::global())
    }

    /// Create a reader that resolves decoders through `registry`.
    pub fn with_registry(data: &'a [u8], registry: &'a TypeRegistry) -> Self {
        Self {
            data,
            pos: 0,
            registry,
            max_length: DEFAULT_MAX_LENGTH,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound every declared count or byte length.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Bound how many containers may enclose a value.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Get the current position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Get remaining bytes count.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Check if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read a fully-qualified value: tag, flag, payload.
    pub fn read(&mut self) -> CodecResult<Value> {
        let tag = self.read_u8()?;
        let decode = self.registry.resolve_decoder(tag)?;
        if self.read_u8()? != VALUE_PRESENT {
            return Ok(Value::Null);
        }
        self.nested(|reader| decode(reader, tag))
    }

    /// Run a payload decoder one level deeper.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> CodecResult<T>) -> CodecResult<T> {
        if self.depth >= self.max_depth {
            return Err(CodecError::DepthExceeded(self.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Read the payload of a built-in type.
    pub fn read_payload(&mut self, data_type: DataType) -> CodecResult<Value> {
        let value = match data_type {
            DataType::Int => Value::Int(self.read_i32()?),
            DataType::Long => Value::Long(self.read_i64()?),
            DataType::String => Value::String(self.read_string()?),
            DataType::Date => Value::Date(self.read_instant()?),
            DataType::Timestamp => Value::Timestamp(self.read_instant()?),
            DataType::Double => Value::Double(self.read_f64()?),
            DataType::Float => Value::Float(self.read_f32()?),
            DataType::List => Value::List(self.read_values("list")?),
            DataType::Set => Value::Set(self.read_values("set")?),
            DataType::Map => Value::Map(self.read_map()?),
            DataType::Uuid => Value::Uuid(self.read_uuid()?),
            DataType::Edge => Value::Edge(self.read_edge()?),
            DataType::Path => Value::Path(self.read_path()?),
            DataType::Property => {
                let key = self.read_string()?;
                let value = Box::new(self.read()?);
                // parent
                self.read()?;
                Value::Property(Property { key, value })
            }
            DataType::Vertex => Value::Vertex(self.read_vertex()?),
            DataType::VertexProperty => Value::VertexProperty(self.read_vertex_property()?),
            DataType::Binding => {
                let key = self.read_string()?;
                let value = Box::new(self.read()?);
                Value::Binding(Binding { key, value })
            }
            DataType::Bytecode => Value::Bytecode(self.read_bytecode()?),
            DataType::P => Value::P(self.read_predicate()?),
            DataType::TextP => Value::TextP(self.read_predicate()?),
            DataType::Traverser => {
                let bulk = self.read_i64()?;
                let value = Box::new(self.read()?);
                Value::Traverser(Traverser { bulk, value })
            }
            DataType::BigDecimal => {
                let scale = self.read_i32()?;
                let unscaled = self.read_big_integer()?;
                Value::BigDecimal(BigDecimal { scale, unscaled })
            }
            DataType::BigInteger => Value::BigInteger(self.read_big_integer()?),
            DataType::Byte => Value::Byte(self.read_u8()? as i8),
            DataType::ByteBuffer => {
                let len = self.read_length("byte buffer")?;
                Value::ByteBuffer(self.read_bytes(len)?.to_vec())
            }
            DataType::Short => Value::Short(self.read_i16()?),
            DataType::Boolean => Value::Boolean(self.read_u8()? != 0),
            DataType::BulkSet => {
                let len = self.read_length("bulk set")?;
                let mut items = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    let item = self.read()?;
                    items.push((item, self.read_i64()?));
                }
                Value::BulkSet(items)
            }
            DataType::Char => Value::Char(self.read_char()?),
            DataType::Duration => Value::Duration(self.read_duration()?),
            DataType::UnspecifiedNull => {
                return Err(CodecError::invalid("unspecified null with a present flag"))
            }
            DataType::Barrier
            | DataType::Cardinality
            | DataType::Column
            | DataType::Direction
            | DataType::Operator
            | DataType::Order
            | DataType::Pick
            | DataType::Pop
            | DataType::Scope
            | DataType::T => return self.read_enum(data_type),
        };
        Ok(value)
    }

    /// Read a map whose keys must be non-null strings, as used by request
    /// arguments and response status/meta attributes. The map itself carries
    /// no tag or flag. A repeated key keeps the last value read.
    pub fn read_string_keyed_map(&mut self) -> CodecResult<HashMap<String, Value>> {
        let len = self.read_length("map")?;
        let mut map = HashMap::with_capacity(len.min(1024));
        for _ in 0..len {
            let key_tag = self.read_u8()?;
            if key_tag != DataType::String.tag() {
                return Err(CodecError::InvalidMapKey(key_tag));
            }
            if self.read_u8()? != VALUE_PRESENT {
                return Err(CodecError::NullKeyForbidden);
            }
            let key = self.read_string()?;
            let value = self.read()?;
            if let Some(previous) = map.insert(key, value) {
                trace!(
                    replaced = previous.type_name(),
                    "duplicate attribute key, keeping the later value"
                );
            }
        }
        Ok(map)
    }

    /// Read a bare string: byte length then UTF-8 bytes.
    pub fn read_string(&mut self) -> CodecResult<String> {
        let len = self.read_length("string")?;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| CodecError::InvalidUtf8(e.to_string()))
    }

    /// Read 16 raw identifier bytes in stored order.
    pub fn read_uuid(&mut self) -> CodecResult<Uuid> {
        let bytes = self.read_bytes(16)?;
        Uuid::from_slice(bytes).map_err(|e| CodecError::invalid(e.to_string()))
    }

    /// Read a 4-byte big-endian length, bounded by the configured maximum.
    pub fn read_length(&mut self, what: &'static str) -> CodecResult<usize> {
        let len = self.read_u32()? as usize;
        if len > self.max_length {
            return Err(CodecError::ValueTooLarge(what, len));
        }
        Ok(len)
    }

    fn read_values(&mut self, what: &'static str) -> CodecResult<Vec<Value>> {
        let len = self.read_length(what)?;
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            items.push(self.read()?);
        }
        Ok(items)
    }

    fn read_map(&mut self) -> CodecResult<Vec<(Value, Value)>> {
        let len = self.read_length("map")?;
        let mut entries = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            let key = self.read_map_key()?;
            let value = self.read()?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    fn read_map_key(&mut self) -> CodecResult<Value> {
        let tag = self.read_u8()?;
        let decode = self.registry.resolve_decoder(tag)?;
        if self.read_u8()? != VALUE_PRESENT {
            return Err(CodecError::NullKeyForbidden);
        }
        self.nested(|reader| decode(reader, tag))
    }

    fn read_enum(&mut self, data_type: DataType) -> CodecResult<Value> {
        let kind =
            EnumKind::from_data_type(data_type).ok_or(CodecError::UnknownTag(data_type.tag()))?;
        match self.read()? {
            Value::String(name) => Ok(Value::Enum(EnumValue { kind, name })),
            other => Err(CodecError::invalid(format!(
                "{} constant must be a string, found {}",
                data_type.name(),
                other.type_name()
            ))),
        }
    }

    fn read_instant(&mut self) -> CodecResult<DateTime<Utc>> {
        let millis = self.read_i64()?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| CodecError::invalid(format!("timestamp out of range: {}", millis)))
    }

    fn read_duration(&mut self) -> CodecResult<TimeDelta> {
        let seconds = self.read_i64()?;
        let nanos = self.read_i32()?;
        TimeDelta::try_seconds(seconds)
            .and_then(|d| d.checked_add(&TimeDelta::nanoseconds(nanos as i64)))
            .ok_or_else(|| CodecError::invalid(format!("duration out of range: {}s", seconds)))
    }

    fn read_char(&mut self) -> CodecResult<char> {
        let first = self.read_u8()?;
        let width = match first {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(CodecError::invalid(format!("invalid char lead byte 0x{:02X}", first))),
        };
        let mut utf8 = [first, 0, 0, 0];
        let rest = self.read_bytes(width - 1)?;
        utf8[1..width].copy_from_slice(rest);
        std::str::from_utf8(&utf8[..width])
            .map_err(|e| CodecError::InvalidUtf8(e.to_string()))?
            .chars()
            .next()
            .ok_or_else(|| CodecError::invalid("empty char"))
    }

    fn read_big_integer(&mut self) -> CodecResult<BigInteger> {
        let len = self.read_length("big integer")?;
        Ok(BigInteger::from_signed_bytes_be(self.read_bytes(len)?))
    }

    fn read_vertex(&mut self) -> CodecResult<Vertex> {
        let id = Box::new(self.read()?);
        let label = self.read_string()?;
        // properties
        self.read()?;
        Ok(Vertex { id, label })
    }

    fn read_edge(&mut self) -> CodecResult<Edge> {
        let id = Box::new(self.read()?);
        let label = self.read_string()?;
        let in_v = Vertex {
            id: Box::new(self.read()?),
            label: self.read_string()?,
        };
        let out_v = Vertex {
            id: Box::new(self.read()?),
            label: self.read_string()?,
        };
        // parent, properties
        self.read()?;
        self.read()?;
        Ok(Edge {
            id,
            label,
            in_v,
            out_v,
        })
    }

    fn read_vertex_property(&mut self) -> CodecResult<VertexProperty> {
        let id = Box::new(self.read()?);
        let label = self.read_string()?;
        let value = Box::new(self.read()?);
        self.read()?;
        self.read()?;
        Ok(VertexProperty { id, label, value })
    }

    fn read_path(&mut self) -> CodecResult<Path> {
        let labels = match self.read()? {
            Value::List(sets) => sets
                .into_iter()
                .map(|set| match set {
                    Value::Set(items) | Value::List(items) => items
                        .into_iter()
                        .map(|item| match item {
                            Value::String(s) => Ok(s),
                            other => Err(CodecError::invalid(format!(
                                "path label must be a string, found {}",
                                other.type_name()
                            ))),
                        })
                        .collect::<CodecResult<Vec<String>>>(),
                    other => Err(CodecError::invalid(format!(
                        "path labels must be sets, found {}",
                        other.type_name()
                    ))),
                })
                .collect::<CodecResult<Vec<Vec<String>>>>()?,
            other => {
                return Err(CodecError::invalid(format!(
                    "path labels must be a list, found {}",
                    other.type_name()
                )))
            }
        };
        let objects = match self.read()? {
            Value::List(objects) => objects,
            other => {
                return Err(CodecError::invalid(format!(
                    "path objects must be a list, found {}",
                    other.type_name()
                )))
            }
        };
        Ok(Path { labels, objects })
    }

    fn read_instructions(&mut self) -> CodecResult<Vec<Instruction>> {
        let len = self.read_length("instructions")?;
        let mut instructions = Vec::with_capacity(len.min(256));
        for _ in 0..len {
            let operator = self.read_string()?;
            let arguments = self.read_values("instruction arguments")?;
            instructions.push(Instruction {
                operator,
                arguments,
            });
        }
        Ok(instructions)
    }

    /// Read a bytecode payload: steps, then sources.
    pub fn read_bytecode(&mut self) -> CodecResult<Bytecode> {
        let step_instructions = self.read_instructions()?;
        let source_instructions = self.read_instructions()?;
        Ok(Bytecode {
            source_instructions,
            step_instructions,
        })
    }

    fn read_predicate(&mut self) -> CodecResult<Predicate> {
        let operator = self.read_string()?;
        let values = self.read_values("predicate values")?;
        Ok(Predicate { operator, values })
    }

    // Low-level read methods

    fn ensure(&self, needed: usize) -> CodecResult<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CodecError::truncated(needed, remaining));
        }
        Ok(())
    }

    /// Read one byte.
    pub fn read_u8(&mut self) -> CodecResult<u8> {
        self.ensure(1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    fn read_i16(&mut self) -> CodecResult<i16> {
        self.ensure(2)?;
        let value = (&self.data[self.pos..]).get_i16();
        self.pos += 2;
        Ok(value)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> CodecResult<u32> {
        self.ensure(4)?;
        let value = (&self.data[self.pos..]).get_u32();
        self.pos += 4;
        Ok(value)
    }

    fn read_i32(&mut self) -> CodecResult<i32> {
        self.ensure(4)?;
        let value = (&self.data[self.pos..]).get_i32();
        self.pos += 4;
        Ok(value)
    }

    fn read_i64(&mut self) -> CodecResult<i64> {
        self.ensure(8)?;
        let value = (&self.data[self.pos..]).get_i64();
        self.pos += 8;
        Ok(value)
    }

    fn read_f32(&mut self) -> CodecResult<f32> {
        self.ensure(4)?;
        let value = (&self.data[self.pos..]).get_f32();
        self.pos += 4;
        Ok(value)
    }

    fn read_f64(&mut self) -> CodecResult<f64> {
        self.ensure(8)?;
        let value = (&self.data[self.pos..]).get_f64();
        self.pos += 8;
        Ok(value)
    }

    /// Read `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        self.ensure(len)?;
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }
}

/// Registry entry for every built-in type.
pub(crate) fn decode_builtin(reader: &mut GraphBinaryReader<'_>, tag: u8) -> CodecResult<Value> {
    let data_type = DataType::from_tag(tag).ok_or(CodecError::UnknownTag(tag))?;
    reader.read_payload(data_type)
}

/// Registry entry for extension types: length-prefixed opaque payload.
pub(crate) fn decode_extension(reader: &mut GraphBinaryReader<'_>, tag: u8) -> CodecResult<Value> {
    let type_name = reader
        .registry
        .extension_name(tag)
        .ok_or(CodecError::UnknownTag(tag))?
        .to_string();
    let len = reader.read_length("extension payload")?;
    let payload = Bytes::copy_from_slice(reader.read_bytes(len)?);
    Ok(Value::Extension(ExtensionValue { type_name, payload }))
}

/// Convenience function to decode a single value with the global registry.
pub fn decode(data: &[u8]) -> CodecResult<Value> {
    GraphBinaryReader::new(data).read()
}
