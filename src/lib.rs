//! # Gremlin Wire
//!
//! GraphBinary v1 wire codec for Gremlin graph database clients.
//!
//! ## Features
//!
//! - **Type codec** - Tagged binary encoding for scalars, collections, graph
//!   elements and traversal values
//! - **Type registry** - Tag-indexed codec table with provider extensions
//! - **Message framing** - Request serialization and response parsing
//! - **Typed errors** - One error type shared by every layer
//!
//! Transport, sessions and connection handling are left to the caller.
//!
//! ## Quick Start
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! gremlin-wire = "0.1"
//! ```
//!
//! ## Serializing a Request
//!
//! ```rust
//! use gremlin_wire::{GraphBinarySerializer, Request, SerializerConfig};
//!
//! let serializer = GraphBinarySerializer::new(SerializerConfig::default()).unwrap();
//! let request = Request::eval("g.V().count()", "g");
//! let bytes = serializer.serialize_request(request).unwrap();
//!
//! // one byte of MIME length, then the MIME type itself
//! assert_eq!(bytes[0] as usize, "application/vnd.graphbinary-v1.0".len());
//! ```
//!
//! ## Bytecode
//!
//! Traversals are sent as bytecode. The `gremlin` argument is encoded before
//! the request envelope is written:
//!
//! ```rust
//! use gremlin_wire::{Bytecode, GraphBinarySerializer, Request, SerializerConfig, Value};
//!
//! let bytecode = Bytecode::new()
//!     .add_step("V", vec![])
//!     .add_step("has", vec![Value::from("name"), Value::from("marko")]);
//!
//! let serializer = GraphBinarySerializer::new(SerializerConfig::default()).unwrap();
//! let bytes = serializer.serialize_request(Request::bytecode(bytecode, "g")).unwrap();
//! assert!(!bytes.is_empty());
//! ```
//!
//! ## Values
//!
//! ```rust
//! use gremlin_wire::graphbinary::{decode, encode};
//! use gremlin_wire::Value;
//!
//! let value = Value::List(vec![Value::Int(1), Value::from("two"), Value::Null]);
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`CodecResult`]:
//!
//! ```rust
//! use gremlin_wire::{CodecError, GraphBinarySerializer, SerializerConfig};
//!
//! let serializer = GraphBinarySerializer::new(SerializerConfig::default()).unwrap();
//! match serializer.deserialize_response(&[0x81]) {
//!     Ok(response) => println!("status {}", response.status.code),
//!     Err(CodecError::TruncatedBuffer { needed, remaining }) => {
//!         eprintln!("need {} more bytes, have {}", needed, remaining)
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`graphbinary`] - Value model, type registry and per-type codec
//! - [`message`] - Request and response envelopes
//! - [`serializer`] - Message framing
//! - [`config`] - Serializer settings
//! - [`error`] - Error taxonomy
//!

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod graphbinary;
pub mod message;
pub mod serializer;

// Re-exports for convenience
pub use config::{SerializerConfig, SerializerConfigBuilder, GRAPHBINARY_MIME_TYPE, GRAPHBINARY_VERSION};
pub use error::{CodecError, CodecResult};
pub use graphbinary::{Bytecode, DataType, TypeRegistry, Value};
pub use message::{Request, Response, ResponseResult, ResponseStatus};
pub use serializer::{GraphBinarySerializer, MessageSerializer};
