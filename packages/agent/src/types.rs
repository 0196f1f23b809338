use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::POST => http::Method::POST,
            Method::PUT => http::Method::PUT,
            Method::DELETE => http::Method::DELETE,
            Method::PATCH => http::Method::PATCH,
            Method::HEAD => http::Method::HEAD,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::HEAD => "HEAD",
        };
        f.write_str(name)
    }
}

/// Query parameters, ordered for deterministic request construction.
pub type Params = BTreeMap<String, String>;

/// A transport response: status code plus the body parsed as JSON.
///
/// Empty or non-JSON bodies come through as `Value::Null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub data: Value,
}

impl Response {
    /// A 200 response with a body.
    pub fn ok(data: Value) -> Self {
        Response { status: 200, data }
    }

    /// A 204 response.
    pub fn no_content() -> Self {
        Response {
            status: 204,
            data: Value::Null,
        }
    }

    /// Check if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response carries no body (204).
    pub fn is_no_content(&self) -> bool {
        self.status == 204
    }
}
