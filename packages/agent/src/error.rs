use serde_json::Value;

/// Transport failures.
///
/// Agents apply their own non-2xx policy (`Status`); everything else is a
/// plain transport failure. Resources pass these through unchanged.
#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("request failed with status {status}")]
    Status { status: u16, data: Value },

    #[error("transport failure: {message}")]
    Transport { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_error_display() {
        let err = AgentError::Status {
            status: 404,
            data: json!({"error": "not found"}),
        };
        assert_eq!(err.to_string(), "request failed with status 404");
    }

    #[test]
    fn transport_error_display() {
        let err = AgentError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn url_error_converts() {
        let err: AgentError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, AgentError::Url(_)));
    }
}
