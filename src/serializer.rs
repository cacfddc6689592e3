//! GraphBinary message serializer.
//!
//! Frames [`Request`]s into the byte layout the server expects and parses
//! response bytes into [`Response`]s. Per-field value encoding is delegated
//! to the [`graphbinary`](crate::graphbinary) type codec.
//!
//! Request layout:
//!
//! ```text
//! [1][mime length] [n][mime type]
//! [1][version]
//! [16][request id]
//! [4][op length] [n][op]
//! [4][processor length] [n][processor]
//! [4][arg count] { [typed string key][typed value] }*
//! ```
//!
//! Response layout:
//!
//! ```text
//! [1][version]
//! [1][id flag] [16][request id]
//! [4][status code]
//! [1][message flag] ([4][length] [n][message])?
//! [status attributes] [result meta]
//! [typed result]
//! ```

use std::sync::Arc;

use bytes::{BufMut, Bytes};
use tracing::{debug, trace};

use crate::config::SerializerConfig;
use crate::error::{CodecError, CodecResult};
use crate::graphbinary::{
    DataType, GraphBinaryReader, GraphBinaryWriter, TypeRegistry, Value, VALUE_NULL,
    VALUE_PRESENT,
};
use crate::message::{arg, op, Request, Response, ResponseResult, ResponseStatus};

/// Only the low byte of the status field carries the code.
const STATUS_CODE_MASK: u32 = 0xFF;

/// Turns requests into bytes and bytes into responses.
pub trait MessageSerializer: Send + Sync {
    /// MIME type this serializer speaks.
    fn mime_type(&self) -> &str;

    /// Serialize a request. The request is consumed.
    fn serialize_request(&self, request: Request) -> CodecResult<Bytes>;

    /// Parse one complete response message.
    fn deserialize_response(&self, data: &[u8]) -> CodecResult<Response>;
}

/// GraphBinary v1 message serializer.
#[derive(Debug, Clone)]
pub struct GraphBinarySerializer {
    config: SerializerConfig,
    registry: Arc<TypeRegistry>,
}

impl GraphBinarySerializer {
    /// Create a serializer with the built-in type registry.
    pub fn new(config: SerializerConfig) -> CodecResult<Self> {
        Self::with_registry(config, Arc::new(TypeRegistry::new()))
    }

    /// Create a serializer sharing an existing registry.
    pub fn with_registry(config: SerializerConfig, registry: Arc<TypeRegistry>) -> CodecResult<Self> {
        config.validate()?;
        Ok(Self { config, registry })
    }

    /// Serializer configuration.
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Type registry used for argument and result values.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Replace the `"gremlin"` argument of a bytecode request with its
    /// encoded bytes. Other requests pass through untouched.
    fn convert_args(&self, op: &str, args: &mut std::collections::BTreeMap<String, Value>) -> CodecResult<()> {
        if op != op::BYTECODE {
            return Ok(());
        }

        match args.remove(arg::GREMLIN) {
            Some(value @ Value::Bytecode(_)) => {
                let mut writer = GraphBinaryWriter::with_registry(&self.registry);
                writer.write(&value)?;
                args.insert(
                    arg::GREMLIN.to_string(),
                    Value::PreEncoded(writer.into_bytes().freeze()),
                );
                Ok(())
            }
            Some(other) => Err(CodecError::NoSerializerForArgument(other.type_name().to_string())),
            None => Err(CodecError::NoSerializerForArgument("none".to_string())),
        }
    }

    fn reader<'a>(&'a self, data: &'a [u8]) -> GraphBinaryReader<'a> {
        GraphBinaryReader::with_registry(data, &self.registry)
            .with_max_length(self.config.max_collection_length)
            .with_max_depth(self.config.max_nesting_depth)
    }

    /// Serialize a request.
    pub fn serialize_request(&self, request: Request) -> CodecResult<Bytes> {
        let Request {
            id,
            op,
            processor,
            mut args,
        } = request;
        self.convert_args(&op, &mut args)?;

        let mut writer = GraphBinaryWriter::with_registry(&self.registry);
        let mime = self.config.mime_type.as_bytes();
        let header = writer.buffer_mut();
        header.put_u8(mime.len() as u8);
        header.put_slice(mime);
        header.put_u8(self.config.version);

        writer.write_uuid(&id)?;
        writer.write_string(&op)?;
        writer.write_string(&processor)?;

        writer.write_length(args.len(), "arguments")?;
        for (name, value) in &args {
            writer.write_string_value(name)?;
            writer.write(value)?;
        }

        debug!(request_id = %id, op = %op, processor = %processor, "serialized request");
        trace!(request_id = %id, bytes = writer.len(), args = args.len(), "request size");
        Ok(writer.into_bytes().freeze())
    }

    /// Parse a response. Any failure aborts the whole message.
    pub fn deserialize_response(&self, data: &[u8]) -> CodecResult<Response> {
        let mut reader = self.reader(data);

        let _version = reader.read_u8()?;
        // The id is never null, but the flag byte is still on the wire.
        let _id_flag = reader.read_u8()?;
        let id = reader.read_uuid()?;

        let code = (reader.read_u32()? & STATUS_CODE_MASK) as u16;
        let message = if reader.read_u8()? == VALUE_PRESENT {
            Some(reader.read_string()?)
        } else {
            None
        };
        let attributes = reader.read_string_keyed_map()?;
        let meta = reader.read_string_keyed_map()?;
        let result = reader.read()?;

        if !reader.is_empty() {
            trace!(request_id = %id, trailing = reader.remaining(), "ignoring trailing response bytes");
        }
        debug!(request_id = %id, status = code, "deserialized response");

        Ok(Response {
            id,
            status: ResponseStatus {
                code,
                message,
                attributes,
            },
            result: ResponseResult { meta, data: result },
        })
    }

    /// Parse a request, as a server would. Pre-encoded bytecode comes back
    /// as a regular bytecode value.
    pub fn deserialize_request(&self, data: &[u8]) -> CodecResult<Request> {
        let mut reader = self.reader(data);

        let mime_len = reader.read_u8()? as usize;
        let mime = reader.read_bytes(mime_len)?;
        if mime != self.config.mime_type.as_bytes() {
            return Err(CodecError::invalid(format!(
                "unexpected mime type '{}'",
                String::from_utf8_lossy(mime)
            )));
        }
        let _version = reader.read_u8()?;
        let id = reader.read_uuid()?;
        let op = reader.read_string()?;
        let processor = reader.read_string()?;

        let count = reader.read_length("arguments")?;
        let mut args = std::collections::BTreeMap::new();
        for _ in 0..count {
            let name = match reader.read()? {
                Value::String(name) => name,
                Value::Null => return Err(CodecError::NullKeyForbidden),
                other => {
                    let tag = other.data_type().map_or(0, DataType::tag);
                    return Err(CodecError::InvalidMapKey(tag));
                }
            };
            args.insert(name, reader.read()?);
        }

        Ok(Request {
            id,
            op,
            processor,
            args,
        })
    }

    /// Serialize a response, as a server would.
    pub fn serialize_response(&self, response: &Response) -> CodecResult<Bytes> {
        let mut writer = GraphBinaryWriter::with_registry(&self.registry);
        writer.buffer_mut().put_u8(self.config.version);
        writer.buffer_mut().put_u8(VALUE_PRESENT);
        writer.write_uuid(&response.id)?;
        writer.buffer_mut().put_u32(response.status.code as u32);

        match &response.status.message {
            Some(message) => {
                writer.buffer_mut().put_u8(VALUE_PRESENT);
                writer.write_string(message)?;
            }
            None => writer.buffer_mut().put_u8(VALUE_NULL),
        }

        for map in [&response.status.attributes, &response.result.meta] {
            writer.write_length(map.len(), "attributes")?;
            for (key, value) in map {
                writer.write_string_value(key)?;
                writer.write(value)?;
            }
        }
        writer.write(&response.result.data)?;
        Ok(writer.into_bytes().freeze())
    }
}

impl MessageSerializer for GraphBinarySerializer {
    fn mime_type(&self) -> &str {
        &self.config.mime_type
    }

    fn serialize_request(&self, request: Request) -> CodecResult<Bytes> {
        GraphBinarySerializer::serialize_request(self, request)
    }

    fn deserialize_response(&self, data: &[u8]) -> CodecResult<Response> {
        GraphBinarySerializer::deserialize_response(self, data)
    }
}
