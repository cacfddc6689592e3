//! Response envelope.

use std::collections::HashMap;

use uuid::Uuid;

use crate::graphbinary::Value;

/// Status codes the client acts on.
pub mod status_code {
    /// Request completed, result is complete
    pub const SUCCESS: u16 = 200;
    /// Request completed with no result
    pub const NO_CONTENT: u16 = 204;
    /// One batch of a streamed result; more responses follow
    pub const PARTIAL_CONTENT: u16 = 206;
}

/// A response sent from the server to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Identifier of the request this answers
    pub id: Uuid,
    /// Status block
    pub status: ResponseStatus,
    /// Result block
    pub result: ResponseResult,
}

/// Response status.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseStatus {
    /// Status code; only the low 8 bits of the wire field are kept
    pub code: u16,
    /// Optional human-readable message
    pub message: Option<String>,
    /// Server-supplied attributes (exception class, stack trace, ...)
    pub attributes: HashMap<String, Value>,
}

impl ResponseStatus {
    /// Check if the request succeeded.
    pub fn is_success(&self) -> bool {
        matches!(
            self.code,
            status_code::SUCCESS | status_code::NO_CONTENT | status_code::PARTIAL_CONTENT
        )
    }

    /// Check if more responses for the same request follow.
    pub fn has_more(&self) -> bool {
        self.code == status_code::PARTIAL_CONTENT
    }
}

/// Response result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseResult {
    /// Result metadata
    pub meta: HashMap<String, Value>,
    /// Result payload
    pub data: Value,
}

impl Default for ResponseResult {
    fn default() -> Self {
        Self {
            meta: HashMap::new(),
            data: Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ResponseStatus {
        ResponseStatus {
            code,
            ..Default::default()
        }
    }

    #[test]
    fn test_success_codes() {
        assert!(status(200).is_success());
        assert!(status(204).is_success());
        assert!(status(206).is_success());
        assert!(!status(0x55).is_success());
    }

    #[test]
    fn test_has_more() {
        assert!(status(206).has_more());
        assert!(!status(200).has_more());
    }

    #[test]
    fn test_default_result() {
        let result = ResponseResult::default();
        assert!(result.meta.is_empty());
        assert!(result.data.is_null());
    }
}
