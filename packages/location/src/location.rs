//! Step and Location types.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

/// One step of a location.
///
/// A literal key addresses a fixed field; an index-step addresses the
/// element identified by a key within the parent collection. Both stringify
/// to their key, so the distinction matters for store semantics (and for
/// equality), not for URI construction.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Step {
    /// A literal key.
    Key(String),
    /// The element identified by this key within the parent collection.
    Index(String),
}

impl Step {
    /// Create a literal key step.
    pub fn key(key: impl Into<String>) -> Self {
        Step::Key(key.into())
    }

    /// Create an index-step. Accepts anything with a string form, so both
    /// string and numeric indices work.
    pub fn index(index: impl ToString) -> Self {
        Step::Index(index.to_string())
    }

    /// Check whether a dynamic value is usable as a bare index: a string
    /// or a number.
    pub fn is_index_value(value: &Value) -> bool {
        matches!(value, Value::String(_) | Value::Number(_))
    }

    /// Check whether a dynamic value has the shape of an index-step: an
    /// object with an `index` field that is itself a valid index.
    pub fn is_index_step(value: &Value) -> bool {
        match value {
            Value::Object(map) => map.get("index").is_some_and(Self::is_index_value),
            _ => false,
        }
    }

    /// Interpret a dynamic value as a step.
    ///
    /// Strings become literal keys; objects of the form `{"index": k}`
    /// become index-steps. Anything else is not a step.
    pub fn from_json(value: &Value) -> Option<Step> {
        match value {
            Value::String(s) => Some(Step::Key(s.clone())),
            Value::Number(n) => Some(Step::Key(n.to_string())),
            Value::Object(map) => {
                let index = map.get("index")?;
                match index {
                    Value::String(s) => Some(Step::Index(s.clone())),
                    Value::Number(n) => Some(Step::Index(n.to_string())),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Canonical string form: literal keys stringify directly, index-steps
    /// stringify their index.
    pub fn as_str(&self) -> &str {
        match self {
            Step::Key(key) => key,
            Step::Index(index) => index,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Step::Key(key) => serializer.serialize_str(key),
            Step::Index(index) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("index", index)?;
                map.end()
            }
        }
    }
}

/// An ordered sequence of steps.
///
/// Used both for URI construction and for addressing into an external
/// store. All derivation is non-destructive: `join`, `with_key` and
/// `with_index` return new locations and never mutate the receiver.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Location {
    pub steps: Vec<Step>,
}

impl Location {
    /// Create an empty (root) location.
    pub fn new() -> Self {
        Location { steps: Vec::new() }
    }

    /// Create a location from steps.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Location { steps }
    }

    /// Interpret a dynamic value as a location: an array whose every
    /// element is a step.
    pub fn from_json(value: &Value) -> Option<Location> {
        match value {
            Value::Array(items) => {
                let steps = items
                    .iter()
                    .map(Step::from_json)
                    .collect::<Option<Vec<_>>>()?;
                Some(Location { steps })
            }
            _ => None,
        }
    }

    /// Check if this location is empty (the root).
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Iterate over steps.
    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// The last step, if any.
    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Concatenate this location with another.
    #[must_use]
    pub fn join(&self, other: &Location) -> Location {
        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Location { steps }
    }

    /// Derive a new location with a literal key appended.
    #[must_use]
    pub fn with_key(&self, key: impl Into<String>) -> Location {
        let mut steps = self.steps.clone();
        steps.push(Step::Key(key.into()));
        Location { steps }
    }

    /// Derive a new location with an index-step appended.
    #[must_use]
    pub fn with_index(&self, index: impl ToString) -> Location {
        let mut steps = self.steps.clone();
        steps.push(Step::Index(index.to_string()));
        Location { steps }
    }

    /// Join step string forms with a separator.
    ///
    /// The default `Display` form uses `.`, which is what action-type
    /// identifiers are derived from.
    pub fn to_string_with(&self, separator: &str) -> String {
        self.steps
            .iter()
            .map(Step::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with("."))
    }
}

impl<S: Into<String> + Clone> From<&[S]> for Location {
    fn from(keys: &[S]) -> Self {
        Location {
            steps: keys.iter().map(|k| Step::Key(k.clone().into())).collect(),
        }
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Location {
    fn from(keys: [S; N]) -> Self {
        Location {
            steps: keys.into_iter().map(|k| Step::Key(k.into())).collect(),
        }
    }
}

impl std::ops::Index<usize> for Location {
    type Output = Step;

    fn index(&self, i: usize) -> &Self::Output {
        &self.steps[i]
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.steps.len()))?;
        for step in &self.steps {
            seq.serialize_element(step)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_string_forms() {
        assert_eq!(Step::key("users").as_str(), "users");
        assert_eq!(Step::index("alice").as_str(), "alice");
        assert_eq!(Step::index(42).as_str(), "42");
    }

    #[test]
    fn is_index_value_accepts_strings_and_numbers() {
        assert!(Step::is_index_value(&json!("alice")));
        assert!(Step::is_index_value(&json!(42)));
        assert!(Step::is_index_value(&json!(1.5)));
        assert!(!Step::is_index_value(&json!(null)));
        assert!(!Step::is_index_value(&json!(true)));
        assert!(!Step::is_index_value(&json!({"index": "x"})));
        assert!(!Step::is_index_value(&json!(["x"])));
    }

    #[test]
    fn is_index_step_requires_index_field() {
        assert!(Step::is_index_step(&json!({"index": "alice"})));
        assert!(Step::is_index_step(&json!({"index": 7})));
        assert!(!Step::is_index_step(&json!({"index": null})));
        assert!(!Step::is_index_step(&json!({"idx": "alice"})));
        assert!(!Step::is_index_step(&json!("alice")));
    }

    #[test]
    fn step_from_json() {
        assert_eq!(Step::from_json(&json!("users")), Some(Step::key("users")));
        assert_eq!(Step::from_json(&json!(3)), Some(Step::key("3")));
        assert_eq!(
            Step::from_json(&json!({"index": "alice"})),
            Some(Step::index("alice"))
        );
        assert_eq!(Step::from_json(&json!({"index": true})), None);
        assert_eq!(Step::from_json(&json!([1])), None);
    }

    #[test]
    fn location_from_json() {
        let loc = Location::from_json(&json!(["app", "users", {"index": "alice"}])).unwrap();
        assert_eq!(loc.len(), 3);
        assert_eq!(loc[2], Step::index("alice"));

        assert!(Location::from_json(&json!("app")).is_none());
        assert!(Location::from_json(&json!(["app", false])).is_none());
    }

    #[test]
    fn join_is_append_only() {
        let base = Location::from(["app", "users"]);
        let child = base.with_index("alice");

        assert_eq!(base.len(), 2);
        assert_eq!(child.len(), 3);
        assert_eq!(child.last(), Some(&Step::index("alice")));
    }

    #[test]
    fn join_concatenates() {
        let a = Location::from(["a", "b"]);
        let b = Location::from(["c"]);
        assert_eq!(a.join(&b).to_string(), "a.b.c");
        assert_eq!(a.join(&Location::new()), a);
        assert_eq!(Location::new().join(&b), b);
    }

    #[test]
    fn display_joins_with_dots() {
        let loc = Location::from(["app", "users"]).with_index("42");
        assert_eq!(loc.to_string(), "app.users.42");
        assert_eq!(loc.to_string_with("/"), "app/users/42");
        assert_eq!(Location::new().to_string(), "");
    }

    #[test]
    fn index_and_key_steps_are_distinct() {
        assert_ne!(Step::key("alice"), Step::index("alice"));
        assert_eq!(Step::key("alice").as_str(), Step::index("alice").as_str());
    }

    #[test]
    fn serialize_shapes() {
        let loc = Location::from(["app"]).with_index("7");
        let value = serde_json::to_value(&loc).unwrap();
        assert_eq!(value, json!(["app", {"index": "7"}]));
    }

    #[test]
    fn location_hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Location::from(["a"]));
        set.insert(Location::from(["a"]).with_index("1"));
        set.insert(Location::from(["a"]));
        assert_eq!(set.len(), 2);
    }
}
