//! Store actions and their type identifiers.

use restree_location::Location;
use serde::Serialize;
use serde_json::Value;

/// Lifecycle phase of one storable at one location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The stable action-type identifier for a signal.
pub fn action_kind(prefix: &str, location: &Location, phase: Phase) -> String {
    format!("{}:{}:{}", prefix, location.to_string_with("."), phase)
}

/// One recorded store signal.
#[derive(Clone, Debug, Serialize)]
pub struct Action {
    /// `"<prefix>:<location>:<phase>"`.
    pub kind: String,
    pub location: Location,
    pub phase: Phase,
    /// The stored value, for ready signals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// The rejection reason, for failed signals.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Action {
    pub fn new(prefix: &str, location: Location, phase: Phase) -> Self {
        Action {
            kind: action_kind(prefix, &location, phase),
            location,
            phase,
            payload: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
