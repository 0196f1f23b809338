//! Error taxonomy for resource composition and invocation.

use restree_agent::AgentError;
use restree_schema::DecodeError;

/// Programmer errors raised synchronously at definition or instantiation
/// time. Never retried, always fatal to the call that triggered them.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("reserved key {key:?} may not be declared as a {kind}")]
    ReservedKey { key: String, kind: &'static str },

    #[error("resource at {uri:?} has no entry constructor")]
    NoEntry { uri: String },

    #[error("unknown method {name:?} on resource at {uri:?}")]
    UnknownMethod { name: String, uri: String },

    #[error("unknown sub-resource {name:?} on resource at {uri:?}")]
    UnknownResource { name: String, uri: String },
}

/// Any failure a resource operation can surface.
///
/// Decode and transport failures propagate by future rejection; they are
/// translated (`DecodeError`) or forwarded (`AgentError`) but never
/// swallowed, and nothing here retries.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoEntry {
            uri: "/api/users".to_string(),
        };
        assert!(err.to_string().contains("/api/users"));
        assert!(err.to_string().contains("no entry"));
    }

    #[test]
    fn decode_error_passes_through_transparently() {
        let err: Error = DecodeError::new("User", vec![]).into();
        assert!(err.to_string().starts_with("decoding failed for schema User"));
    }

    #[test]
    fn agent_error_passes_through_transparently() {
        let err: Error = AgentError::Transport {
            message: "connection refused".to_string(),
        }
        .into();
        assert!(err.to_string().contains("connection refused"));
    }
}
