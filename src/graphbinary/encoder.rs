//! GraphBinary encoder.

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::data_type::{DataType, VALUE_NULL, VALUE_PRESENT};
use super::registry::TypeRegistry;
use super::types::{
    BigInteger, Bytecode, Edge, Instruction, Path, Predicate, Value, Vertex, VertexProperty,
};
use crate::error::{CodecError, CodecResult};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// GraphBinary encoder that writes values to a byte buffer.
pub struct GraphBinaryWriter<'r> {
    registry: &'r TypeRegistry,
    buffer: BytesMut,
}

impl GraphBinaryWriter<'static> {
    /// Create a writer over the global registry.
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::global())
    }
}

impl Default for GraphBinaryWriter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> GraphBinaryWriter<'r> {
    /// Create a writer that resolves encoders through `registry`.
    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            buffer: BytesMut::with_capacity(256),
        }
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the bytes as a slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Consume the writer and return the bytes.
    pub fn into_bytes(self) -> BytesMut {
        self.buffer
    }

    /// Mutable access to the underlying buffer, for framing written around
    /// typed values.
    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    /// Write a fully-qualified value: tag, flag, payload.
    ///
    /// Pre-encoded bytes are appended as they are.
    pub fn write(&mut self, value: &Value) -> CodecResult<()> {
        if let Value::PreEncoded(raw) = value {
            self.buffer.put_slice(raw);
            return Ok(());
        }

        let (tag, encode) = self.registry.resolve_encoder(value)?;
        self.buffer.put_u8(tag);
        if value.is_null() {
            self.buffer.put_u8(VALUE_NULL);
            return Ok(());
        }
        self.buffer.put_u8(VALUE_PRESENT);
        encode(self, value)
    }

    /// Write an untyped null (`0xFE 0x01`).
    pub fn write_null(&mut self) {
        self.buffer.put_u8(DataType::UnspecifiedNull.tag());
        self.buffer.put_u8(VALUE_NULL);
    }

    /// Write the payload of a built-in value.
    pub fn write_payload(&mut self, value: &Value) -> CodecResult<()> {
        match value {
            Value::Null => Ok(()),
            Value::Boolean(b) => {
                self.buffer.put_u8(u8::from(*b));
                Ok(())
            }
            Value::Byte(v) => {
                self.buffer.put_i8(*v);
                Ok(())
            }
            Value::Short(v) => {
                self.buffer.put_i16(*v);
                Ok(())
            }
            Value::Int(v) => {
                self.buffer.put_i32(*v);
                Ok(())
            }
            Value::Long(v) => {
                self.buffer.put_i64(*v);
                Ok(())
            }
            Value::BigInteger(v) => self.write_big_integer(v),
            Value::BigDecimal(v) => {
                self.buffer.put_i32(v.scale);
                self.write_big_integer(&v.unscaled)
            }
            Value::Float(v) => {
                self.buffer.put_f32(*v);
                Ok(())
            }
            Value::Double(v) => {
                self.buffer.put_f64(*v);
                Ok(())
            }
            Value::Char(c) => {
                let mut utf8 = [0u8; 4];
                self.buffer.put_slice(c.encode_utf8(&mut utf8).as_bytes());
                Ok(())
            }
            Value::String(s) => self.write_string(s),
            Value::Date(dt) | Value::Timestamp(dt) => {
                self.write_instant(dt);
                Ok(())
            }
            Value::Duration(d) => {
                self.write_duration(d);
                Ok(())
            }
            Value::Uuid(id) => self.write_uuid(id),
            Value::ByteBuffer(b) => {
                self.write_length(b.len(), "byte buffer")?;
                self.buffer.put_slice(b);
                Ok(())
            }
            Value::List(items) | Value::Set(items) => self.write_values(items, "list"),
            Value::Map(entries) => self.write_map(entries),
            Value::Vertex(v) => self.write_vertex(v),
            Value::Edge(e) => self.write_edge(e),
            Value::VertexProperty(vp) => self.write_vertex_property(vp),
            Value::Property(p) => {
                self.write_string(&p.key)?;
                self.write(&p.value)?;
                self.write_null();
                Ok(())
            }
            Value::Path(p) => self.write_path(p),
            Value::Bytecode(bc) => self.write_bytecode(bc),
            Value::Binding(b) => {
                self.write_string(&b.key)?;
                self.write(&b.value)
            }
            Value::P(p) | Value::TextP(p) => self.write_predicate(p),
            Value::Enum(e) => self.write_string_value(&e.name),
            Value::Traverser(t) => {
                self.buffer.put_i64(t.bulk);
                self.write(&t.value)
            }
            Value::BulkSet(items) => {
                self.write_length(items.len(), "bulk set")?;
                for (item, bulk) in items {
                    self.write(item)?;
                    self.buffer.put_i64(*bulk);
                }
                Ok(())
            }
            Value::PreEncoded(_) | Value::Extension(_) => {
                Err(CodecError::UnsupportedType(value.type_name().to_string()))
            }
        }
    }

    /// Write a 4-byte big-endian length prefix.
    pub fn write_length(&mut self, len: usize, what: &'static str) -> CodecResult<()> {
        let len32 = u32::try_from(len).map_err(|_| CodecError::ValueTooLarge(what, len))?;
        self.buffer.put_u32(len32);
        Ok(())
    }

    /// Write a bare string: byte length then UTF-8 bytes, no tag or flag.
    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        let bytes = value.as_bytes();
        self.write_length(bytes.len(), "string")?;
        self.buffer.put_slice(bytes);
        Ok(())
    }

    /// Write a fully-qualified, non-null string.
    pub fn write_string_value(&mut self, value: &str) -> CodecResult<()> {
        self.buffer.put_u8(DataType::String.tag());
        self.buffer.put_u8(VALUE_PRESENT);
        self.write_string(value)
    }

    /// Write an identifier as two big-endian 64-bit halves of the 128-bit
    /// integer spelled by its hex digits.
    pub fn write_uuid(&mut self, id: &Uuid) -> CodecResult<()> {
        let digits = id.simple().to_string();
        let value = u128::from_str_radix(&digits, 16)
            .map_err(|e| CodecError::invalid(format!("identifier {}: {}", id, e)))?;
        self.buffer.put_u64((value >> 64) as u64);
        self.buffer.put_u64(value as u64);
        Ok(())
    }

    fn write_instant(&mut self, dt: &DateTime<Utc>) {
        self.buffer.put_i64(dt.timestamp_millis());
    }

    fn write_duration(&mut self, d: &TimeDelta) {
        let mut seconds = d.num_seconds();
        let mut nanos = d.subsec_nanos() as i64;
        // Nanos are always non-negative on the wire.
        if nanos < 0 {
            seconds -= 1;
            nanos += NANOS_PER_SECOND;
        }
        self.buffer.put_i64(seconds);
        self.buffer.put_i32(nanos as i32);
    }

    fn write_big_integer(&mut self, v: &BigInteger) -> CodecResult<()> {
        let bytes = v.to_signed_bytes_be();
        self.write_length(bytes.len(), "big integer")?;
        self.buffer.put_slice(bytes);
        Ok(())
    }

    fn write_values(&mut self, items: &[Value], what: &'static str) -> CodecResult<()> {
        self.write_length(items.len(), what)?;
        for item in items {
            self.write(item)?;
        }
        Ok(())
    }

    fn write_map(&mut self, entries: &[(Value, Value)]) -> CodecResult<()> {
        self.write_length(entries.len(), "map")?;
        for (key, value) in entries {
            if key.is_null() {
                return Err(CodecError::NullKeyForbidden);
            }
            self.write(key)?;
            self.write(value)?;
        }
        Ok(())
    }

    fn write_vertex(&mut self, v: &Vertex) -> CodecResult<()> {
        self.write(&v.id)?;
        self.write_string(&v.label)?;
        // properties
        self.write_null();
        Ok(())
    }

    fn write_edge(&mut self, e: &Edge) -> CodecResult<()> {
        self.write(&e.id)?;
        self.write_string(&e.label)?;
        self.write(&e.in_v.id)?;
        self.write_string(&e.in_v.label)?;
        self.write(&e.out_v.id)?;
        self.write_string(&e.out_v.label)?;
        // parent, properties
        self.write_null();
        self.write_null();
        Ok(())
    }

    fn write_vertex_property(&mut self, vp: &VertexProperty) -> CodecResult<()> {
        self.write(&vp.id)?;
        self.write_string(&vp.label)?;
        self.write(&vp.value)?;
        self.write_null();
        self.write_null();
        Ok(())
    }

    fn write_path(&mut self, p: &Path) -> CodecResult<()> {
        let labels = p
            .labels
            .iter()
            .map(|set| Value::Set(set.iter().map(|l| Value::String(l.clone())).collect()))
            .collect();
        self.write(&Value::List(labels))?;
        self.buffer.put_u8(DataType::List.tag());
        self.buffer.put_u8(VALUE_PRESENT);
        self.write_values(&p.objects, "path objects")
    }

    fn write_instructions(&mut self, instructions: &[Instruction]) -> CodecResult<()> {
        self.write_length(instructions.len(), "instructions")?;
        for instruction in instructions {
            self.write_string(&instruction.operator)?;
            self.write_values(&instruction.arguments, "instruction arguments")?;
        }
        Ok(())
    }

    /// Write a bytecode payload: steps, then sources.
    pub fn write_bytecode(&mut self, bc: &Bytecode) -> CodecResult<()> {
        self.write_instructions(&bc.step_instructions)?;
        self.write_instructions(&bc.source_instructions)
    }

    fn write_predicate(&mut self, p: &Predicate) -> CodecResult<()> {
        self.write_string(&p.operator)?;
        self.write_values(&p.values, "predicate values")
    }
}

/// Registry entry for every built-in type.
pub(crate) fn encode_builtin(writer: &mut GraphBinaryWriter<'_>, value: &Value) -> CodecResult<()> {
    writer.write_payload(value)
}

/// Registry entry for extension types: length-prefixed opaque payload.
pub(crate) fn encode_extension(
    writer: &mut GraphBinaryWriter<'_>,
    value: &Value,
) -> CodecResult<()> {
    match value {
        Value::Extension(ext) => {
            writer.write_length(ext.payload.len(), "extension payload")?;
            writer.buffer.put_slice(&ext.payload);
            Ok(())
        }
        other => Err(CodecError::UnsupportedType(other.type_name().to_string())),
    }
}

/// Convenience function to encode a single value with the global registry.
pub fn encode(value: &Value) -> CodecResult<BytesMut> {
    let mut writer = GraphBinaryWriter::new();
    writer.write(value)?;
    Ok(writer.into_bytes())
}
