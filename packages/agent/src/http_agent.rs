//! Reqwest-backed agent.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::types::{Method, Params, Response};

/// An HTTP agent on top of `reqwest`.
///
/// Holds the base URL every resource URI is resolved against, plus default
/// headers sent with every request. Non-2xx responses fail with
/// [`AgentError::Status`] carrying the decoded body.
///
/// # Example
///
/// ```ignore
/// use restree_agent::{Agent, HttpAgent, Params};
///
/// let agent = HttpAgent::new("https://api.example.com")?
///     .with_default_header("Authorization", "Bearer secret");
///
/// let response = agent.get("/api/users", &Params::new()).await?;
/// assert!(response.is_success());
/// ```
pub struct HttpAgent {
    client: Client,
    base_url: Url,
    default_headers: HashMap<String, String>,
}

impl HttpAgent {
    /// Create an agent resolving request URIs against a base URL.
    pub fn new(base_url: &str) -> Result<Self, AgentError> {
        Ok(HttpAgent {
            client: Client::new(),
            base_url: Url::parse(base_url)?,
            default_headers: HashMap::new(),
        })
    }

    /// Add a default header sent with every request.
    pub fn with_default_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    fn resolve(&self, uri: &str) -> Result<Url, AgentError> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(Url::parse(uri)?);
        }
        Ok(self.base_url.join(uri)?)
    }
}

#[async_trait]
impl Agent for HttpAgent {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        params: &Params,
    ) -> Result<Response, AgentError> {
        let url = self.resolve(uri)?;
        log::debug!("{} {}", method, url);

        let mut builder = self.client.request(method.into(), url.clone());

        if !params.is_empty() {
            builder = builder.query(params);
        }
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

        let response = Response { status, data };
        if !response.is_success() {
            log::warn!("{} {} failed with status {}", method, url, status);
            return Err(AgentError::Status {
                status: response.status,
                data: response.data,
            });
        }

        log::debug!("{} {} -> {}", method, url, status);
        Ok(response)
    }
}
