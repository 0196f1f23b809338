//! Decode failure reporting.

use crate::schema::Violation;

/// A response failed schema validation.
///
/// Carries the structured violation list plus a human-readable multi-line
/// report, one bullet per violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Name of the schema that rejected the input.
    pub schema: String,
    /// The structured validation errors.
    pub violations: Vec<Violation>,
}

impl DecodeError {
    pub fn new(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        DecodeError {
            schema: schema.into(),
            violations,
        }
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "decoding failed for schema {} ({} error{})",
            self.schema,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "\n - {}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for DecodeError {}
