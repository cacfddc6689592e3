//! Gremlin request/response envelopes.
//!
//! A [`Request`] names an operation, the server-side processor that should
//! handle it, and a string-keyed argument map. A [`Response`] carries the
//! correlated request identifier, a status block and the result payload.

pub mod request;
pub mod response;

pub use request::Request;
pub use response::{Response, ResponseResult, ResponseStatus};

/// Operation names.
pub mod op {
    /// Evaluate a script string
    pub const EVAL: &str = "eval";
    /// Evaluate serialized traversal bytecode
    pub const BYTECODE: &str = "bytecode";
    /// Answer an authentication challenge
    pub const AUTHENTICATION: &str = "authentication";
    /// Close a session
    pub const CLOSE: &str = "close";
}

/// Processor names.
pub mod processor {
    /// Sessionless script evaluation
    pub const STANDARD: &str = "";
    /// Traversal (bytecode) evaluation
    pub const TRAVERSAL: &str = "traversal";
    /// In-session evaluation
    pub const SESSION: &str = "session";
}

/// Well-known argument names.
pub mod arg {
    /// Script text or traversal bytecode
    pub const GREMLIN: &str = "gremlin";
    /// Traversal source aliases
    pub const ALIASES: &str = "aliases";
    /// Script variable bindings
    pub const BINDINGS: &str = "bindings";
    /// Script language
    pub const LANGUAGE: &str = "language";
    /// Session identifier
    pub const SESSION: &str = "session";
    /// Results per streamed response
    pub const BATCH_SIZE: &str = "batchSize";
    /// Server-side timeout in milliseconds
    pub const EVALUATION_TIMEOUT: &str = "evaluationTimeout";
}
