//! Canned-response agent for tests in dependent crates.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::types::{Method, Params, Response};

/// One recorded call served by a [`StaticAgent`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub uri: String,
    pub body: Option<Value>,
    pub params: Params,
}

enum Route {
    Respond(Response),
    FailStatus { status: u16, data: Value },
    FailTransport(String),
}

/// An agent serving canned responses keyed by `(method, uri)`.
///
/// Unrouted requests fail with a transport error naming the miss. Every
/// served call is recorded for assertions.
///
/// # Example
///
/// ```rust
/// use restree_agent::{Agent, Method, Params, Response, StaticAgent};
/// use serde_json::json;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let agent = StaticAgent::new()
///     .on(Method::GET, "/api/users", Response::ok(json!([])));
///
/// let response = agent.get("/api/users", &Params::new()).await.unwrap();
/// assert_eq!(response.data, json!([]));
/// assert_eq!(agent.calls().len(), 1);
/// # });
/// ```
pub struct StaticAgent {
    routes: HashMap<(Method, String), Route>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StaticAgent {
    pub fn new() -> Self {
        StaticAgent {
            routes: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve a response for a route.
    pub fn on(mut self, method: Method, uri: impl Into<String>, response: Response) -> Self {
        self.routes
            .insert((method, uri.into()), Route::Respond(response));
        self
    }

    /// Fail a route with a non-2xx status.
    pub fn fail_with_status(
        mut self,
        method: Method,
        uri: impl Into<String>,
        status: u16,
        data: Value,
    ) -> Self {
        self.routes
            .insert((method, uri.into()), Route::FailStatus { status, data });
        self
    }

    /// Fail a route with a transport error.
    pub fn fail_with_transport(
        mut self,
        method: Method,
        uri: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.routes
            .insert((method, uri.into()), Route::FailTransport(message.into()));
        self
    }

    /// Calls served so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for StaticAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Agent for StaticAgent {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        params: &Params,
    ) -> Result<Response, AgentError> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            uri: uri.to_string(),
            body,
            params: params.clone(),
        });

        match self.routes.get(&(method, uri.to_string())) {
            Some(Route::Respond(response)) => Ok(response.clone()),
            Some(Route::FailStatus { status, data }) => Err(AgentError::Status {
                status: *status,
                data: data.clone(),
            }),
            Some(Route::FailTransport(message)) => Err(AgentError::Transport {
                message: message.clone(),
            }),
            None => Err(AgentError::Transport {
                message: format!("no route for {} {}", method, uri),
            }),
        }
    }
}
