//! GraphBinary type tags.
//!
//! Every fully-qualified value starts with a one-byte type tag, followed by
//! a value flag and the type-specific payload.

/// Value flag: a payload follows.
pub const VALUE_PRESENT: u8 = 0x00;

/// Value flag: the value is null, no payload follows.
pub const VALUE_NULL: u8 = 0x01;

/// GraphBinary type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// 32-bit signed integer
    Int = 0x01,
    /// 64-bit signed integer
    Long = 0x02,
    /// UTF-8 string
    String = 0x03,
    /// Date as epoch milliseconds
    Date = 0x04,
    /// Timestamp as epoch milliseconds
    Timestamp = 0x05,
    /// 64-bit float
    Double = 0x07,
    /// 32-bit float
    Float = 0x08,
    /// Ordered list
    List = 0x09,
    /// Map with typed keys
    Map = 0x0A,
    /// Set
    Set = 0x0B,
    /// 128-bit identifier
    Uuid = 0x0C,
    /// Graph edge
    Edge = 0x0D,
    /// Traversal path
    Path = 0x0E,
    /// Edge property
    Property = 0x0F,
    /// Graph vertex
    Vertex = 0x11,
    /// Vertex property
    VertexProperty = 0x12,
    /// Barrier enum
    Barrier = 0x13,
    /// Named variable binding
    Binding = 0x14,
    /// Traversal bytecode
    Bytecode = 0x15,
    /// Cardinality enum
    Cardinality = 0x16,
    /// Column enum
    Column = 0x17,
    /// Direction enum
    Direction = 0x18,
    /// Operator enum
    Operator = 0x19,
    /// Order enum
    Order = 0x1A,
    /// Pick enum
    Pick = 0x1B,
    /// Pop enum
    Pop = 0x1C,
    /// Predicate
    P = 0x1E,
    /// Scope enum
    Scope = 0x1F,
    /// Element token enum
    T = 0x20,
    /// Traverser with bulk
    Traverser = 0x21,
    /// Arbitrary precision decimal
    BigDecimal = 0x22,
    /// Arbitrary precision integer
    BigInteger = 0x23,
    /// 8-bit signed integer
    Byte = 0x24,
    /// Raw bytes
    ByteBuffer = 0x25,
    /// 16-bit signed integer
    Short = 0x26,
    /// Boolean
    Boolean = 0x27,
    /// Text predicate
    TextP = 0x28,
    /// Values with bulk counts
    BulkSet = 0x2A,
    /// Single character
    Char = 0x80,
    /// Seconds and nanoseconds
    Duration = 0x81,
    /// Null of no particular type.
    UnspecifiedNull = 0xFE,
}

impl DataType {
    /// Every built-in type, used to seed the registry.
    pub const ALL: [DataType; 41] = [
        DataType::Int,
        DataType::Long,
        DataType::String,
        DataType::Date,
        DataType::Timestamp,
        DataType::Double,
        DataType::Float,
        DataType::List,
        DataType::Map,
        DataType::Set,
        DataType::Uuid,
        DataType::Edge,
        DataType::Path,
        DataType::Property,
        DataType::Vertex,
        DataType::VertexProperty,
        DataType::Barrier,
        DataType::Binding,
        DataType::Bytecode,
        DataType::Cardinality,
        DataType::Column,
        DataType::Direction,
        DataType::Operator,
        DataType::Order,
        DataType::Pick,
        DataType::Pop,
        DataType::P,
        DataType::Scope,
        DataType::T,
        DataType::Traverser,
        DataType::BigDecimal,
        DataType::BigInteger,
        DataType::Byte,
        DataType::ByteBuffer,
        DataType::Short,
        DataType::Boolean,
        DataType::TextP,
        DataType::BulkSet,
        DataType::Char,
        DataType::Duration,
        DataType::UnspecifiedNull,
    ];

    /// Look up a built-in type by its tag byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|dt| dt.tag() == tag)
    }

    /// The tag byte written on the wire.
    #[inline]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Lowercase name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::List => "list",
            DataType::Map => "map",
            DataType::Set => "set",
            DataType::Uuid => "uuid",
            DataType::Edge => "edge",
            DataType::Path => "path",
            DataType::Property => "property",
            DataType::Vertex => "vertex",
            DataType::VertexProperty => "vertexproperty",
            DataType::Barrier => "barrier",
            DataType::Binding => "binding",
            DataType::Bytecode => "bytecode",
            DataType::Cardinality => "cardinality",
            DataType::Column => "column",
            DataType::Direction => "direction",
            DataType::Operator => "operator",
            DataType::Order => "order",
            DataType::Pick => "pick",
            DataType::Pop => "pop",
            DataType::P => "p",
            DataType::Scope => "scope",
            DataType::T => "t",
            DataType::Traverser => "traverser",
            DataType::BigDecimal => "bigdecimal",
            DataType::BigInteger => "biginteger",
            DataType::Byte => "byte",
            DataType::ByteBuffer => "bytebuffer",
            DataType::Short => "short",
            DataType::Boolean => "boolean",
            DataType::TextP => "textp",
            DataType::BulkSet => "bulkset",
            DataType::Char => "char",
            DataType::Duration => "duration",
            DataType::UnspecifiedNull => "null",
        }
    }
}

/// Traversal enum families. All share one payload layout: a fully-qualified
/// string holding the constant's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    /// `Barrier`: `normSack`
    Barrier,
    /// `Cardinality`: `single`, `list`, `set`
    Cardinality,
    /// `Column`: `keys`, `values`
    Column,
    /// `Direction`: `OUT`, `IN`, `BOTH`
    Direction,
    /// `Operator`: `sum`, `minus`, ...
    Operator,
    /// `Order`: `asc`, `desc`, `shuffle`
    Order,
    /// `Pick`: `any`, `none`
    Pick,
    /// `Pop`: `first`, `last`, `all`, `mixed`
    Pop,
    /// `Scope`: `global`, `local`
    Scope,
    /// `T`: `id`, `label`, `key`, `value`
    T,
}

impl EnumKind {
    /// The wire type for this enum family.
    pub fn data_type(self) -> DataType {
        match self {
            EnumKind::Barrier => DataType::Barrier,
            EnumKind::Cardinality => DataType::Cardinality,
            EnumKind::Column => DataType::Column,
            EnumKind::Direction => DataType::Direction,
            EnumKind::Operator => DataType::Operator,
            EnumKind::Order => DataType::Order,
            EnumKind::Pick => DataType::Pick,
            EnumKind::Pop => DataType::Pop,
            EnumKind::Scope => DataType::Scope,
            EnumKind::T => DataType::T,
        }
    }

    /// The enum family for a wire type, if it is one.
    pub fn from_data_type(data_type: DataType) -> Option<Self> {
        match data_type {
            DataType::Barrier => Some(EnumKind::Barrier),
            DataType::Cardinality => Some(EnumKind::Cardinality),
            DataType::Column => Some(EnumKind::Column),
            DataType::Direction => Some(EnumKind::Direction),
            DataType::Operator => Some(EnumKind::Operator),
            DataType::Order => Some(EnumKind::Order),
            DataType::Pick => Some(EnumKind::Pick),
            DataType::Pop => Some(EnumKind::Pop),
            DataType::Scope => Some(EnumKind::Scope),
            DataType::T => Some(EnumKind::T),
            _ => None,
        }
    }
}
