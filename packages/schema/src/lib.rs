//! Schema capability for restree.
//!
//! A resource validates and decodes HTTP response bodies against a schema.
//! The capability is kept minimal so any validation library can sit behind
//! it: `decode` turns untrusted input into a value or a list of violations,
//! `encode` is total. This crate ships structural schemas (string, number,
//! bool, object, array, map) sufficient for typical REST payloads, plus the
//! `SchemaAdapter` that resources bind to: parse a response body, decode it
//! and raise `DecodeError` on failure, or rebind to a different schema.
//!
//! # Example
//!
//! ```rust
//! use restree_schema::{ObjectSchema, NumberSchema, StringSchema, SchemaAdapter};
//! use serde_json::json;
//!
//! let user = ObjectSchema::new("User")
//!     .prop("name", StringSchema)
//!     .prop("score", NumberSchema);
//!
//! let adapter = SchemaAdapter::new(user.into_schema());
//! let decoded = adapter.decode(&json!({"name": "John", "score": 10})).unwrap();
//! assert_eq!(decoded["name"], json!("John"));
//!
//! let err = adapter.decode(&json!({"name": 5})).unwrap_err();
//! assert_eq!(err.violations.len(), 2);
//! ```

mod adapter;
mod error;
mod schema;

pub use adapter::SchemaAdapter;
pub use error::DecodeError;
pub use schema::{
    AnySchema, ArraySchema, BoolSchema, MapSchema, NumberSchema, ObjectSchema, Schema,
    StringSchema, Violation,
};
