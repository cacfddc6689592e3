//! GraphBinary serialization format.
//!
//! GraphBinary is the type-tagged binary format Gremlin servers use for
//! request arguments and response results.
//!
//! # Layout
//!
//! Every fully-qualified value is written as
//!
//! ```text
//! [type tag: 1 byte][value flag: 1 byte][payload]
//! ```
//!
//! A flag of `0x01` marks a null and no payload follows. All multi-byte
//! numbers are big-endian. Lengths and element counts are 4 bytes.
//!
//! # Supported Types
//!
//! - **Scalars**: boolean, byte, short, int, long, float, double, char
//! - **Arbitrary precision**: big integer, big decimal
//! - **Text and bytes**: string (byte-length prefixed UTF-8), byte buffer
//! - **Temporal**: date, timestamp, duration
//! - **Identifier**: 128-bit UUID
//! - **Collections**: list, set, map, bulk set
//! - **Graph elements**: vertex, edge, vertex property, property, path
//! - **Traversal**: bytecode, binding, predicates, enum constants, traverser
//!
//! Provider-specific types can be added through
//! [`TypeRegistry::builder`](registry::TypeRegistry::builder).

pub mod data_type;
pub mod decoder;
pub mod encoder;
pub mod registry;
pub mod types;

pub use data_type::{DataType, EnumKind, VALUE_NULL, VALUE_PRESENT};
pub use decoder::{decode, GraphBinaryReader, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LENGTH};
pub use encoder::{encode, GraphBinaryWriter};
pub use registry::{DecodeFn, EncodeFn, TypeRegistry, TypeRegistryBuilder};
pub use types::{
    BigDecimal, BigInteger, Binding, Bytecode, Edge, EnumValue, ExtensionValue, Instruction, Path,
    Predicate, Property, Traverser, Value, Vertex, VertexProperty,
};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeDelta};
    use uuid::Uuid;

    fn roundtrip(value: Value) {
        let bytes = encode(&value).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn test_roundtrip_null() {
        roundtrip(Value::Null);
    }

    #[test]
    fn test_roundtrip_scalars() {
        roundtrip(Value::Boolean(true));
        roundtrip(Value::Boolean(false));
        roundtrip(Value::Byte(i8::MIN));
        roundtrip(Value::Short(i16::MAX));
        for v in [0, 1, -1, i32::MIN, i32::MAX] {
            roundtrip(Value::Int(v));
        }
        for v in [0, -1, i64::MIN, i64::MAX] {
            roundtrip(Value::Long(v));
        }
        roundtrip(Value::Float(1.5));
        roundtrip(Value::Double(-3.25e100));
        roundtrip(Value::Char('ß'));
    }

    #[test]
    fn test_roundtrip_big_numbers() {
        roundtrip(Value::BigInteger(BigInteger::from(i128::MAX)));
        roundtrip(Value::BigInteger(BigInteger::from(-98765432109876543210i128)));
        roundtrip(Value::BigInteger(BigInteger::from(0i64)));
        roundtrip(Value::BigDecimal(BigDecimal::new(31415i64, 4)));
    }

    #[test]
    fn test_roundtrip_strings() {
        for s in ["", "a", "g.V().count()", "κόσμε", "🦀 crab", &"x".repeat(70_000)] {
            roundtrip(Value::from(s));
        }
    }

    #[test]
    fn test_roundtrip_temporal() {
        let instant = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        roundtrip(Value::Date(instant));
        roundtrip(Value::Timestamp(instant));
        roundtrip(Value::Duration(TimeDelta::milliseconds(90_061_001)));
        roundtrip(Value::Duration(TimeDelta::milliseconds(-1)));
        roundtrip(Value::Duration(TimeDelta::zero()));
    }

    #[test]
    fn test_roundtrip_collections() {
        roundtrip(Value::List(vec![]));
        roundtrip(Value::Set(vec![]));
        roundtrip(Value::Map(vec![]));
        roundtrip(Value::ByteBuffer(vec![]));
        roundtrip(Value::ByteBuffer(vec![0, 1, 255]));
        roundtrip(Value::List(vec![
            Value::Int(1),
            Value::from("two"),
            Value::Null,
            Value::List(vec![Value::Boolean(true)]),
        ]));
        roundtrip(Value::Set(vec![Value::from("a"), Value::from("b")]));
        roundtrip(Value::Map(vec![
            (Value::from("name"), Value::from("marko")),
            (Value::Int(7), Value::List(vec![Value::Long(1)])),
            (Value::Uuid(Uuid::nil()), Value::Null),
        ]));
        roundtrip(Value::BulkSet(vec![(Value::from("a"), 3), (Value::Int(1), 1)]));
    }

    #[test]
    fn test_roundtrip_identifiers() {
        let ids = [
            Uuid::nil(),
            Uuid::from_u128(u128::MAX),
            Uuid::parse_str("41d2e28a-20a4-4ab0-b379-d810dede3786").unwrap(),
            Uuid::new_v4(),
        ];
        for id in ids {
            let bytes = encode(&Value::Uuid(id)).unwrap();
            match decode(&bytes).unwrap() {
                Value::Uuid(decoded) => assert_eq!(decoded.to_string(), id.to_string()),
                other => panic!("Expected uuid, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_roundtrip_graph_elements() {
        let marko = Vertex::new(Value::Long(1), "person");
        let lop = Vertex::new(Value::Long(3), "software");
        roundtrip(Value::Vertex(marko.clone()));
        roundtrip(Value::Edge(Edge {
            id: Box::new(Value::Long(9)),
            label: "created".into(),
            in_v: lop,
            out_v: marko.clone(),
        }));
        roundtrip(Value::VertexProperty(VertexProperty {
            id: Box::new(Value::Long(0)),
            label: "name".into(),
            value: Box::new(Value::from("marko")),
        }));
        roundtrip(Value::Property(Property {
            key: "weight".into(),
            value: Box::new(Value::Double(0.4)),
        }));
        roundtrip(Value::Path(Path {
            labels: vec![vec!["a".into()], vec![], vec!["b".into(), "c".into()]],
            objects: vec![Value::Vertex(marko), Value::from("x"), Value::Int(3)],
        }));
    }

    #[test]
    fn test_roundtrip_traversal_values() {
        let bytecode = Bytecode::new()
            .add_source("withStrategies", vec![])
            .add_step("V", vec![Value::Long(1)])
            .add_step(
                "has",
                vec![
                    Value::from("age"),
                    Value::P(Predicate::new("gt", vec![Value::Int(30)])),
                ],
            )
            .add_step(
                "where",
                vec![Value::TextP(Predicate::new("startingWith", vec!["ma".into()]))],
            )
            .add_step(
                "by",
                vec![
                    Value::Enum(EnumValue::new(EnumKind::T, "id")),
                    Value::Enum(EnumValue::new(EnumKind::Order, "desc")),
                ],
            )
            .add_step(
                "local",
                vec![Value::Bytecode(Bytecode::new().add_step("count", vec![]))],
            )
            .add_step(
                "inject",
                vec![Value::Binding(Binding {
                    key: "x".into(),
                    value: Box::new(Value::Int(1)),
                })],
            );
        roundtrip(Value::Bytecode(bytecode));
        roundtrip(Value::Bytecode(Bytecode::new()));
        roundtrip(Value::Traverser(Traverser {
            bulk: 2,
            value: Box::new(Value::from("v")),
        }));
        for kind in [
            EnumKind::Barrier,
            EnumKind::Cardinality,
            EnumKind::Column,
            EnumKind::Direction,
            EnumKind::Operator,
            EnumKind::Order,
            EnumKind::Pick,
            EnumKind::Pop,
            EnumKind::Scope,
            EnumKind::T,
        ] {
            roundtrip(Value::Enum(EnumValue::new(kind, "x")));
        }
    }

    #[test]
    fn test_roundtrip_extension() {
        let registry = TypeRegistry::builder()
            .register_extension("janusgraph.RelationIdentifier", 0xF1)
            .build()
            .unwrap();
        let value = Value::Extension(ExtensionValue {
            type_name: "janusgraph.RelationIdentifier".into(),
            payload: bytes::Bytes::from_static(b"4r-6-2dx-9"),
        });
        let mut writer = GraphBinaryWriter::with_registry(&registry);
        writer.write(&value).unwrap();
        let bytes = writer.into_bytes();
        let decoded = GraphBinaryReader::with_registry(&bytes, &registry).read().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_deeply_nested() {
        let mut value = Value::Int(0);
        for _ in 0..64 {
            value = Value::List(vec![Value::string_map([("inner", value)])]);
        }
        roundtrip(value);
    }

    #[test]
    fn test_reader_consumes_exactly_one_value() {
        let mut writer = GraphBinaryWriter::new();
        writer.write(&Value::from("first")).unwrap();
        writer.write(&Value::Int(2)).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = GraphBinaryReader::new(&bytes);
        assert_eq!(reader.read().unwrap(), Value::from("first"));
        assert_eq!(reader.read().unwrap(), Value::Int(2));
        assert!(reader.is_empty());
    }
}
