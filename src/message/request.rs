//! Request envelope.

use std::collections::BTreeMap;

use uuid::Uuid;

use super::{arg, op, processor};
use crate::graphbinary::{Bytecode, Value};

/// Default script language for `eval` requests.
pub const DEFAULT_LANGUAGE: &str = "gremlin-groovy";

/// A request sent from the client to the server.
///
/// Arguments are kept ordered by name so that serialization is
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Correlates the request with its responses
    pub id: Uuid,
    /// Operation name, see [`op`]
    pub op: String,
    /// Processor name, see [`processor`]
    pub processor: String,
    /// Named arguments
    pub args: BTreeMap<String, Value>,
}

impl Request {
    /// Create a request with a fresh identifier and no arguments.
    pub fn new(op: impl Into<String>, processor: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            op: op.into(),
            processor: processor.into(),
            args: BTreeMap::new(),
        }
    }

    /// Script evaluation request against `traversal_source`.
    pub fn eval(script: impl Into<String>, traversal_source: &str) -> Self {
        let script: String = script.into();
        Self::new(op::EVAL, processor::STANDARD)
            .with_arg(arg::GREMLIN, script)
            .with_arg(arg::LANGUAGE, DEFAULT_LANGUAGE)
            .with_arg(arg::ALIASES, Value::string_map([("g", traversal_source)]))
    }

    /// Bytecode evaluation request against `traversal_source`.
    pub fn bytecode(bytecode: Bytecode, traversal_source: &str) -> Self {
        Self::new(op::BYTECODE, processor::TRAVERSAL)
            .with_arg(arg::GREMLIN, bytecode)
            .with_arg(arg::ALIASES, Value::string_map([("g", traversal_source)]))
    }

    /// Use a specific identifier.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set an argument, replacing any previous value.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Attach script variable bindings.
    pub fn with_bindings<K, V, I>(self, bindings: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.with_arg(arg::BINDINGS, Value::string_map(bindings))
    }

    /// Route the request through an open session.
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.processor = processor::SESSION.to_string();
        self.with_arg(arg::SESSION, session_id.to_string())
    }

    /// Check if this request evaluates bytecode.
    pub fn is_bytecode(&self) -> bool {
        self.op == op::BYTECODE
    }

    /// Get an argument by name.
    pub fn arg(&self, name: &str) -> Option<&Value> {
        self.args.get(name)
    }
}
