//! End-to-end wire format checks through the public API.

use std::collections::HashMap;

use gremlin_wire::graphbinary::{decode, encode, GraphBinaryReader, Predicate};
use gremlin_wire::message::{arg, op, processor};
use gremlin_wire::{
    Bytecode, CodecError, GraphBinarySerializer, MessageSerializer, Request, Response,
    ResponseResult, ResponseStatus, SerializerConfig, Value,
};
use uuid::Uuid;

const MIME: &[u8] = b"application/vnd.graphbinary-v1.0";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn serializer() -> GraphBinarySerializer {
    init_tracing();
    GraphBinarySerializer::new(SerializerConfig::default()).unwrap()
}

/// Builds a response by hand so the decoder is checked against literal bytes.
struct ResponseBytes(Vec<u8>);

impl ResponseBytes {
    fn new(id: Uuid, raw_status: u32) -> Self {
        let mut buf = vec![0x81, 0x00];
        buf.extend_from_slice(id.as_bytes());
        buf.extend_from_slice(&raw_status.to_be_bytes());
        Self(buf)
    }

    fn message(mut self, message: Option<&str>) -> Self {
        match message {
            Some(m) => {
                self.0.push(0x00);
                self.0.extend_from_slice(&(m.len() as u32).to_be_bytes());
                self.0.extend_from_slice(m.as_bytes());
            }
            None => self.0.push(0x01),
        }
        self
    }

    fn raw(mut self, bytes: &[u8]) -> Self {
        self.0.extend_from_slice(bytes);
        self
    }
}

#[test]
fn eval_request_is_byte_exact() {
    let id = Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap();
    let bytes = serializer()
        .serialize_request(Request::new("eval", "").with_id(id).with_arg("gremlin", "g.V()"))
        .unwrap();

    let mut expected = vec![0x20];
    expected.extend_from_slice(MIME);
    expected.push(0x81);
    expected.extend_from_slice(&[0; 15]);
    expected.push(0x01);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x04, b'e', b'v', b'a', b'l']);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    expected.extend_from_slice(&[0x03, 0x00, 0x00, 0x00, 0x00, 0x07]);
    expected.extend_from_slice(b"gremlin");
    expected.extend_from_slice(&[0x03, 0x00, 0x00, 0x00, 0x00, 0x05]);
    expected.extend_from_slice(b"g.V()");

    assert_eq!(bytes.to_vec(), expected);
}

#[test]
fn string_length_counts_bytes() {
    let bytes = encode(&Value::from("héllo")).unwrap();
    assert_eq!(&bytes[..6], &[0x03, 0x00, 0x00, 0x00, 0x00, 0x06]);
    assert_eq!(decode(&bytes).unwrap(), Value::from("héllo"));
}

#[test]
fn empty_list_and_null_map() {
    assert_eq!(
        &encode(&Value::List(vec![])).unwrap()[..],
        &[0x09, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
    // typed null: tag then the null flag, nothing else
    assert_eq!(decode(&[0x0A, 0x01]).unwrap(), Value::Null);
}

#[test]
fn status_upper_bits_are_discarded() {
    let data = ResponseBytes::new(Uuid::nil(), 0x0000_01C8)
        .message(None)
        .raw(&[0, 0, 0, 0, 0, 0, 0, 0, 0xFE, 0x01])
        .0;
    let response = serializer().deserialize_response(&data).unwrap();
    assert_eq!(response.status.code, 200);
    assert_eq!(response.status.code >> 8, 0);
}

#[test]
fn full_response_decodes() {
    let id = Uuid::new_v4();
    let data = ResponseBytes::new(id, 206)
        .message(Some(""))
        .raw(&[0, 0, 0, 1])
        .raw(&[0x03, 0x00, 0, 0, 0, 4])
        .raw(b"host")
        .raw(&[0x03, 0x00, 0, 0, 0, 3])
        .raw(b"h:1")
        .raw(&[0, 0, 0, 0])
        .raw(&[0x09, 0x00, 0, 0, 0, 2])
        .raw(&[0x02, 0x00, 0, 0, 0, 0, 0, 0, 0, 6])
        .raw(&[0xFE, 0x01])
        .0;

    let response = serializer().deserialize_response(&data).unwrap();
    assert_eq!(response.id, id);
    assert!(response.status.has_more());
    assert_eq!(response.status.message.as_deref(), Some(""));
    assert_eq!(response.status.attributes.get("host"), Some(&Value::from("h:1")));
    assert!(response.result.meta.is_empty());
    assert_eq!(
        response.result.data,
        Value::List(vec![Value::Long(6), Value::Null])
    );
}

#[test]
fn non_string_attribute_key_aborts() {
    let data = ResponseBytes::new(Uuid::nil(), 200)
        .message(None)
        .raw(&[0, 0, 0, 1])
        .raw(&[0x01, 0x00, 0, 0, 0, 1])
        .raw(&[0x03, 0x00, 0, 0, 0, 0])
        .0;
    let err = serializer().deserialize_response(&data).unwrap_err();
    assert_eq!(err, CodecError::InvalidMapKey(0x01));
    assert!(err.is_decode_error());
}

#[test]
fn truncated_result_aborts() {
    let data = ResponseBytes::new(Uuid::nil(), 200)
        .message(None)
        .raw(&[0, 0, 0, 0, 0, 0, 0, 0])
        .raw(&[0x03, 0x00, 0, 0, 0, 10])
        .raw(b"abc")
        .0;
    let err = serializer().deserialize_response(&data).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedBuffer {
            needed: 10,
            remaining: 3
        }
    );
}

#[test]
fn bytecode_argument_is_pre_encoded() {
    let bytecode = Bytecode::new()
        .add_step("V", vec![])
        .add_step("has", vec![Value::from("age"), Value::P(Predicate::new("lt", vec![Value::Int(40)]))]);
    let ser = serializer();
    let bytes = ser
        .serialize_request(
            Request::new(op::BYTECODE, processor::TRAVERSAL).with_arg(arg::GREMLIN, bytecode.clone()),
        )
        .unwrap();

    let mut reader = GraphBinaryReader::new(&bytes);
    let mime_len = reader.read_u8().unwrap() as usize;
    reader.read_bytes(mime_len + 1 + 16).unwrap();
    assert_eq!(reader.read_string().unwrap(), op::BYTECODE);
    assert_eq!(reader.read_string().unwrap(), processor::TRAVERSAL);
    assert_eq!(reader.read_u32().unwrap(), 1);
    assert_eq!(reader.read().unwrap(), Value::from(arg::GREMLIN));
    assert_eq!(reader.read().unwrap(), Value::Bytecode(bytecode));
    assert!(reader.is_empty());
}

#[test]
fn bytecode_op_rejects_script() {
    let err = serializer()
        .serialize_request(
            Request::new(op::BYTECODE, processor::TRAVERSAL).with_arg(arg::GREMLIN, "g.V()"),
        )
        .unwrap_err();
    assert_eq!(err, CodecError::NoSerializerForArgument("string".to_string()));
    assert_eq!(err.to_string(), "No serializer found for argument of type 'string'");
}

#[test]
fn request_and_response_mirror() {
    let ser = serializer();
    let request = Request::eval("g.V().limit(n)", "g").with_bindings([("n", Value::Int(2))]);
    let parsed = ser
        .deserialize_request(&ser.serialize_request(request.clone()).unwrap())
        .unwrap();
    assert_eq!(parsed, request);

    let mut meta = HashMap::new();
    meta.insert("count".to_string(), Value::Long(2));
    let response = Response {
        id: request.id,
        status: ResponseStatus {
            code: 200,
            message: None,
            attributes: HashMap::new(),
        },
        result: ResponseResult {
            meta,
            data: Value::Set(vec![Value::from("marko"), Value::from("vadas")]),
        },
    };
    let bytes = ser.serialize_response(&response).unwrap();
    assert_eq!(ser.deserialize_response(&bytes).unwrap(), response);
}

#[test]
fn serializer_behind_trait_object() {
    let ser: Box<dyn MessageSerializer> = Box::new(serializer());
    assert_eq!(ser.mime_type().as_bytes(), MIME);
    assert!(ser.deserialize_response(&[]).is_err());
}

#[test]
fn deeply_nested_result_is_rejected() {
    let mut data = ResponseBytes::new(Uuid::nil(), 200)
        .message(None)
        .raw(&[0, 0, 0, 0, 0, 0, 0, 0])
        .0;
    for _ in 0..200_000 {
        data.extend_from_slice(&[0x09, 0x00, 0x00, 0x00, 0x00, 0x01]);
    }
    data.extend_from_slice(&[0xFE, 0x01]);

    let ser = serializer();
    let limit = ser.config().max_nesting_depth;
    // main-thread sized stack
    let err = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(move || ser.deserialize_response(&data).unwrap_err())
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(err, CodecError::DepthExceeded(limit));
    assert!(err.is_decode_error());
}
