//! The response adapter bound to each resource.

use std::sync::Arc;

use serde_json::Value;

use crate::error::DecodeError;
use crate::schema::{Schema, Violation};

/// HTTP status for "no content".
const NO_CONTENT: u16 = 204;

/// A schema bound together with the parse/decode/encode/report utilities a
/// resource needs.
///
/// Adapters are cheap to clone and rebind: collection resources hold one
/// bound to the collection schema and derive entry-bound ones with
/// [`SchemaAdapter::with`] (a collection `post` validates against the entry
/// schema, not the collection schema).
#[derive(Clone)]
pub struct SchemaAdapter {
    schema: Arc<dyn Schema>,
}

impl SchemaAdapter {
    pub fn new(schema: Arc<dyn Schema>) -> Self {
        SchemaAdapter { schema }
    }

    /// The bound schema.
    pub fn schema(&self) -> &Arc<dyn Schema> {
        &self.schema
    }

    /// Extract the raw body from a response.
    ///
    /// Returns `None` for "no content" responses (status 204 or a null
    /// body); otherwise the undecoded body.
    pub fn parse(&self, status: u16, data: &Value) -> Option<Value> {
        if status == NO_CONTENT || data.is_null() {
            None
        } else {
            Some(data.clone())
        }
    }

    /// Run the schema decoder and report the result.
    pub fn decode(&self, input: &Value) -> Result<Value, DecodeError> {
        self.report(self.schema.decode(input))
    }

    /// Run the schema encoder. Total.
    pub fn encode(&self, value: &Value) -> Value {
        self.schema.encode(value)
    }

    /// Reduce a decode result: the value on success, a `DecodeError`
    /// carrying the violations on failure.
    pub fn report(&self, result: Result<Value, Vec<Violation>>) -> Result<Value, DecodeError> {
        result.map_err(|violations| DecodeError::new(self.schema.name(), violations))
    }

    /// An adapter rebound to a different schema.
    #[must_use]
    pub fn with(&self, schema: Arc<dyn Schema>) -> SchemaAdapter {
        SchemaAdapter { schema }
    }

    /// An adapter bound to the partial variant of the schema, or to the
    /// schema itself when it has no structural props.
    #[must_use]
    pub fn partial(&self) -> SchemaAdapter {
        match self.schema.partial() {
            Some(partial) => SchemaAdapter { schema: partial },
            None => self.clone(),
        }
    }
}
