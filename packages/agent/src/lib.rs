//! Transport capability for restree.
//!
//! Resources issue their HTTP calls through the object-safe [`Agent`]
//! trait: `request(method, uri, body, params)` resolving to a
//! `{status, data}` [`Response`]. The wire protocol is delegated entirely
//! to the agent; resources only assume standard status-code conventions
//! (2xx success, 204 no body).
//!
//! [`HttpAgent`] is the reqwest-backed implementation. A canned-response
//! [`StaticAgent`] for unit tests in dependent crates is available behind
//! the `test-utils` feature.

mod agent;
mod error;
mod http_agent;
mod types;

#[cfg(feature = "test-utils")]
pub mod static_agent;

pub use agent::Agent;
pub use error::AgentError;
pub use http_agent::HttpAgent;
pub use types::{Method, Params, Response};

#[cfg(feature = "test-utils")]
pub use static_agent::StaticAgent;
