//! The Agent trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::types::{Method, Params, Response};

/// The transport capability resources issue their calls through.
///
/// Implementations own the wire protocol: header and cookie configuration,
/// status validation policy, timeouts and retries (restree itself never
/// retries). The verb helpers all funnel into [`Agent::request`].
///
/// # Object Safety
///
/// This trait is object-safe: resources hold `Arc<dyn Agent>`.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Issue one request.
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        params: &Params,
    ) -> Result<Response, AgentError>;

    async fn head(&self, uri: &str, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::HEAD, uri, None, params).await
    }

    async fn get(&self, uri: &str, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::GET, uri, None, params).await
    }

    async fn put(&self, uri: &str, body: Value, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::PUT, uri, Some(body), params).await
    }

    async fn patch(&self, uri: &str, body: Value, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::PATCH, uri, Some(body), params).await
    }

    async fn post(&self, uri: &str, body: Value, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::POST, uri, Some(body), params).await
    }

    async fn delete(&self, uri: &str, params: &Params) -> Result<Response, AgentError> {
        self.request(Method::DELETE, uri, None, params).await
    }
}

#[async_trait]
impl<T: Agent + ?Sized> Agent for std::sync::Arc<T> {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        params: &Params,
    ) -> Result<Response, AgentError> {
        self.as_ref().request(method, uri, body, params).await
    }
}
