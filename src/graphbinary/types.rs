//! GraphBinary value types.

use bytes::Bytes;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::data_type::{DataType, EnumKind};

/// A value that can be written to or read from GraphBinary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Int(i32),
    /// 64-bit signed integer
    Long(i64),
    /// Arbitrary-precision integer
    BigInteger(BigInteger),
    /// Arbitrary-precision decimal
    BigDecimal(BigDecimal),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit floating point
    Double(f64),
    /// Single character
    Char(char),
    /// UTF-8 string
    String(String),
    /// Calendar date, millisecond precision
    Date(DateTime<Utc>),
    /// Instant, millisecond precision
    Timestamp(DateTime<Utc>),
    /// Signed duration
    Duration(TimeDelta),
    /// 128-bit identifier
    Uuid(Uuid),
    /// Raw byte buffer
    ByteBuffer(Vec<u8>),
    /// Ordered list of values
    List(Vec<Value>),
    /// Set of values, in wire order
    Set(Vec<Value>),
    /// Map with arbitrary keys, in wire order
    Map(Vec<(Value, Value)>),
    /// Graph vertex
    Vertex(Vertex),
    /// Graph edge
    Edge(Edge),
    /// Vertex property
    VertexProperty(VertexProperty),
    /// Edge or meta property
    Property(Property),
    /// Traversal path
    Path(Path),
    /// Serialized traversal
    Bytecode(Bytecode),
    /// Named variable binding
    Binding(Binding),
    /// Predicate (`P.eq`, `P.within`, ...)
    P(Predicate),
    /// Text predicate (`TextP.startingWith`, ...)
    TextP(Predicate),
    /// Traversal enum constant
    Enum(EnumValue),
    /// Traverser with bulk
    Traverser(Traverser),
    /// Values paired with their bulk counts
    BulkSet(Vec<(Value, i64)>),
    /// Bytes that are already GraphBinary, appended without tag or flag
    PreEncoded(Bytes),
    /// Provider-specific value handled through a registered extension tag
    Extension(ExtensionValue),
}

impl Value {
    /// The built-in wire type for this value. `None` for pre-encoded bytes
    /// and extensions, whose tag is not fixed.
    pub fn data_type(&self) -> Option<DataType> {
        let dt = match self {
            Value::Null => DataType::UnspecifiedNull,
            Value::Boolean(_) => DataType::Boolean,
            Value::Byte(_) => DataType::Byte,
            Value::Short(_) => DataType::Short,
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::BigInteger(_) => DataType::BigInteger,
            Value::BigDecimal(_) => DataType::BigDecimal,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Char(_) => DataType::Char,
            Value::String(_) => DataType::String,
            Value::Date(_) => DataType::Date,
            Value::Timestamp(_) => DataType::Timestamp,
            Value::Duration(_) => DataType::Duration,
            Value::Uuid(_) => DataType::Uuid,
            Value::ByteBuffer(_) => DataType::ByteBuffer,
            Value::List(_) => DataType::List,
            Value::Set(_) => DataType::Set,
            Value::Map(_) => DataType::Map,
            Value::Vertex(_) => DataType::Vertex,
            Value::Edge(_) => DataType::Edge,
            Value::VertexProperty(_) => DataType::VertexProperty,
            Value::Property(_) => DataType::Property,
            Value::Path(_) => DataType::Path,
            Value::Bytecode(_) => DataType::Bytecode,
            Value::Binding(_) => DataType::Binding,
            Value::P(_) => DataType::P,
            Value::TextP(_) => DataType::TextP,
            Value::Enum(e) => e.kind.data_type(),
            Value::Traverser(_) => DataType::Traverser,
            Value::BulkSet(_) => DataType::BulkSet,
            Value::PreEncoded(_) | Value::Extension(_) => return None,
        };
        Some(dt)
    }

    /// Lowercase runtime type name, used in error payloads.
    pub fn type_name(&self) -> &str {
        match self {
            Value::PreEncoded(_) => "preencoded",
            Value::Extension(ext) => &ext.type_name,
            other => other.data_type().map(DataType::name).unwrap_or("unknown"),
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as a 64-bit integer, widening the smaller integer types.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as a 64-bit float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|i| i as f64),
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list or set elements.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) | Value::Set(l) => Some(l),
            _ => None,
        }
    }

    /// Try to get as bytecode reference.
    pub fn as_bytecode(&self) -> Option<&Bytecode> {
        match self {
            Value::Bytecode(b) => Some(b),
            _ => None,
        }
    }

    /// Look up a string key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Build a string-keyed map value.
    pub fn string_map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (Value::String(k.into()), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Numeric payloads
// ============================================================================

/// Arbitrary-precision integer held as minimal big-endian two's-complement
/// bytes, the form it takes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger(Vec<u8>);

impl BigInteger {
    /// Wrap two's-complement big-endian bytes. Redundant sign bytes are
    /// stripped; an empty slice is zero.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self(vec![0]);
        }
        let mut start = 0;
        while start + 1 < bytes.len() {
            let (b, next) = (bytes[start], bytes[start + 1]);
            let redundant = (b == 0x00 && next & 0x80 == 0) || (b == 0xFF && next & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        Self(bytes[start..].to_vec())
    }

    /// Two's-complement big-endian bytes.
    pub fn to_signed_bytes_be(&self) -> &[u8] {
        &self.0
    }

    /// Check the sign bit.
    pub fn is_negative(&self) -> bool {
        self.0.first().map_or(false, |b| b & 0x80 != 0)
    }

    /// Convert to `i128` if it fits.
    pub fn to_i128(&self) -> Option<i128> {
        if self.0.len() > 16 {
            return None;
        }
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 16];
        buf[16 - self.0.len()..].copy_from_slice(&self.0);
        Some(i128::from_be_bytes(buf))
    }
}

impl From<i128> for BigInteger {
    fn from(v: i128) -> Self {
        Self::from_signed_bytes_be(&v.to_be_bytes())
    }
}

impl From<i64> for BigInteger {
    fn from(v: i64) -> Self {
        Self::from(v as i128)
    }
}

impl From<u64> for BigInteger {
    fn from(v: u64) -> Self {
        Self::from(v as i128)
    }
}

/// Arbitrary-precision decimal: `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    /// Power-of-ten divisor
    pub scale: i32,
    /// Unscaled digits
    pub unscaled: BigInteger,
}

impl BigDecimal {
    /// Create a decimal from its unscaled value and scale.
    pub fn new(unscaled: impl Into<BigInteger>, scale: i32) -> Self {
        Self {
            scale,
            unscaled: unscaled.into(),
        }
    }
}

// ============================================================================
// Graph elements
// ============================================================================

/// Graph vertex. Properties are not carried on the wire by default.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// Vertex identifier
    pub id: Box<Value>,
    /// Vertex label
    pub label: String,
}

impl Vertex {
    /// Create a vertex.
    pub fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
        }
    }
}

/// Graph edge between an out-vertex and an in-vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Edge identifier
    pub id: Box<Value>,
    /// Edge label
    pub label: String,
    /// Head vertex
    pub in_v: Vertex,
    /// Tail vertex
    pub out_v: Vertex,
}

/// Property attached to a vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    /// Property identifier
    pub id: Box<Value>,
    /// Property key
    pub label: String,
    /// Property value
    pub value: Box<Value>,
}

/// Key/value property of an edge or vertex property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key
    pub key: String,
    /// Property value
    pub value: Box<Value>,
}

/// Path of objects with the step labels attached at each position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    /// Step labels, one set per object
    pub labels: Vec<Vec<String>>,
    /// Objects visited
    pub objects: Vec<Value>,
}

// ============================================================================
// Traversal payloads
// ============================================================================

/// One bytecode instruction: an operator name and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Step or source name
    pub operator: String,
    /// Typed arguments
    pub arguments: Vec<Value>,
}

impl Instruction {
    /// Create an instruction.
    pub fn new(operator: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            operator: operator.into(),
            arguments,
        }
    }
}

/// Serialized traversal: source instructions (`withStrategies`, ...) and
/// step instructions (`V`, `has`, `out`, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bytecode {
    /// Traversal source configuration
    pub source_instructions: Vec<Instruction>,
    /// Traversal steps
    pub step_instructions: Vec<Instruction>,
}

impl Bytecode {
    /// Create empty bytecode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step instruction.
    pub fn add_step(mut self, operator: impl Into<String>, arguments: Vec<Value>) -> Self {
        self.step_instructions.push(Instruction::new(operator, arguments));
        self
    }

    /// Append a source instruction.
    pub fn add_source(mut self, operator: impl Into<String>, arguments: Vec<Value>) -> Self {
        self.source_instructions.push(Instruction::new(operator, arguments));
        self
    }

    /// Check if there are no instructions at all.
    pub fn is_empty(&self) -> bool {
        self.source_instructions.is_empty() && self.step_instructions.is_empty()
    }
}

/// Variable binding inside bytecode.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Variable name
    pub key: String,
    /// Bound value
    pub value: Box<Value>,
}

/// Predicate operator with its operand values.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Predicate name (`eq`, `gt`, `within`, ...)
    pub operator: String,
    /// Operands
    pub values: Vec<Value>,
}

impl Predicate {
    /// Create a predicate.
    pub fn new(operator: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            operator: operator.into(),
            values,
        }
    }
}

/// Constant of one of the traversal enum families.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    /// Enum family
    pub kind: EnumKind,
    /// Constant name
    pub name: String,
}

impl EnumValue {
    /// Create an enum constant.
    pub fn new(kind: EnumKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// Traverser result with its bulk count.
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser {
    /// Number of traversers this one stands for
    pub bulk: i64,
    /// Traverser value
    pub value: Box<Value>,
}

/// Value of a provider-specific type, identified by name and carried as
/// opaque payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionValue {
    /// Registered type name
    pub type_name: String,
    /// Encoded payload, without the length prefix
    pub payload: Bytes,
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Byte(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Short(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Char(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<Bytecode> for Value {
    fn from(v: Bytecode) -> Self {
        Value::Bytecode(v)
    }
}

impl From<BigInteger> for Value {
    fn from(v: BigInteger) -> Self {
        Value::BigInteger(v)
    }
}

impl From<Vertex> for Value {
    fn from(v: Vertex) -> Self {
        Value::Vertex(v)
    }
}
