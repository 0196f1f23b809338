//! The Schema trait and structural schema implementations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::{Map, Value};

/// One structured validation error.
///
/// `path` is the location of the offending value inside the decoded input
/// (empty for the root), `message` says what was expected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Prefix this violation's path with a parent segment.
    fn nested(self, prefix: &str) -> Violation {
        Violation {
            path: format!("{}{}", prefix, self.path),
            message: self.message,
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// A validation capability.
///
/// `decode` turns untrusted input into a validated value or a list of
/// violations; `encode` is total (no failure path defined). `partial`
/// derives a lenient variant where structural fields become optional,
/// returning `None` for schemas with no structural props (passthrough).
///
/// # Object Safety
///
/// This trait is object-safe: resources hold `Arc<dyn Schema>`.
pub trait Schema: Send + Sync {
    /// Name for diagnostics, e.g. `"User"` or `"Array<User>"`.
    fn name(&self) -> &str;

    /// Validate and decode input.
    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>>;

    /// Encode a value for the wire. Total.
    fn encode(&self, value: &Value) -> Value;

    /// Best-effort partial variant, or `None` when the schema has no
    /// structural props to relax.
    fn partial(&self) -> Option<Arc<dyn Schema>> {
        None
    }
}

impl<T: Schema + ?Sized> Schema for Box<T> {
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
        self.as_ref().decode(input)
    }

    fn encode(&self, value: &Value) -> Value {
        self.as_ref().encode(value)
    }

    fn partial(&self) -> Option<Arc<dyn Schema>> {
        self.as_ref().partial()
    }
}

/// Accepts anything, unchanged. The default schema when a resource
/// declares none.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySchema;

impl Schema for AnySchema {
    fn name(&self) -> &str {
        "any"
    }

    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
        Ok(input.clone())
    }

    fn encode(&self, value: &Value) -> Value {
        value.clone()
    }
}

macro_rules! primitive_schema {
    ($ty:ident, $name:literal, $pattern:pat) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl Schema for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
                match input {
                    $pattern => Ok(input.clone()),
                    other => Err(vec![Violation::new(
                        "",
                        format!("expected {}, got {}", $name, kind_of(other)),
                    )]),
                }
            }

            fn encode(&self, value: &Value) -> Value {
                value.clone()
            }
        }
    };
}

primitive_schema!(StringSchema, "string", Value::String(_));
primitive_schema!(NumberSchema, "number", Value::Number(_));
primitive_schema!(BoolSchema, "bool", Value::Bool(_));

/// An object schema with named, individually-typed props.
///
/// Props are required by default; `optional` relaxes one. Unknown fields
/// pass through untouched on both decode and encode.
#[derive(Clone)]
pub struct ObjectSchema {
    name: String,
    props: BTreeMap<String, Arc<dyn Schema>>,
    required: BTreeSet<String>,
}

impl ObjectSchema {
    pub fn new(name: impl Into<String>) -> Self {
        ObjectSchema {
            name: name.into(),
            props: BTreeMap::new(),
            required: BTreeSet::new(),
        }
    }

    /// Declare a required prop.
    pub fn prop(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.props.insert(name, Arc::new(schema));
        self
    }

    /// Declare an optional prop.
    pub fn optional(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.props.insert(name.into(), Arc::new(schema));
        self
    }

    /// Erase to a shared schema handle.
    pub fn into_schema(self) -> Arc<dyn Schema> {
        Arc::new(self)
    }
}

impl Schema for ObjectSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
        let map = match input {
            Value::Object(map) => map,
            other => {
                return Err(vec![Violation::new(
                    "",
                    format!("expected {}, got {}", self.name, kind_of(other)),
                )])
            }
        };

        let mut violations = Vec::new();
        let mut decoded = Map::new();

        for (key, value) in map {
            match self.props.get(key) {
                Some(schema) => match schema.decode(value) {
                    Ok(value) => {
                        decoded.insert(key.clone(), value);
                    }
                    Err(nested) => {
                        let prefix = format!(".{}", key);
                        violations.extend(nested.into_iter().map(|v| v.nested(&prefix)));
                    }
                },
                // Unknown fields pass through.
                None => {
                    decoded.insert(key.clone(), value.clone());
                }
            }
        }

        for key in &self.required {
            if !map.contains_key(key) {
                violations.push(Violation::new(
                    format!(".{}", key),
                    format!("missing required prop of {}", self.name),
                ));
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(decoded))
        } else {
            Err(violations)
        }
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut encoded = Map::new();
                for (key, value) in map {
                    match self.props.get(key) {
                        Some(schema) => {
                            encoded.insert(key.clone(), schema.encode(value));
                        }
                        None => {
                            encoded.insert(key.clone(), value.clone());
                        }
                    }
                }
                Value::Object(encoded)
            }
            other => other.clone(),
        }
    }

    fn partial(&self) -> Option<Arc<dyn Schema>> {
        Some(Arc::new(ObjectSchema {
            name: format!("Partial<{}>", self.name),
            props: self.props.clone(),
            required: BTreeSet::new(),
        }))
    }
}

/// An array whose every element decodes against one entry schema.
#[derive(Clone)]
pub struct ArraySchema {
    name: String,
    entry: Arc<dyn Schema>,
}

impl ArraySchema {
    pub fn new(entry: impl Schema + 'static) -> Self {
        Self::of(Arc::new(entry))
    }

    pub fn of(entry: Arc<dyn Schema>) -> Self {
        ArraySchema {
            name: format!("Array<{}>", entry.name()),
            entry,
        }
    }

    pub fn into_schema(self) -> Arc<dyn Schema> {
        Arc::new(self)
    }
}

impl Schema for ArraySchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
        let items = match input {
            Value::Array(items) => items,
            other => {
                return Err(vec![Violation::new(
                    "",
                    format!("expected {}, got {}", self.name, kind_of(other)),
                )])
            }
        };

        let mut violations = Vec::new();
        let mut decoded = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match self.entry.decode(item) {
                Ok(value) => decoded.push(value),
                Err(nested) => {
                    let prefix = format!("[{}]", i);
                    violations.extend(nested.into_iter().map(|v| v.nested(&prefix)));
                }
            }
        }

        if violations.is_empty() {
            Ok(Value::Array(decoded))
        } else {
            Err(violations)
        }
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => {
                Value::Array(items.iter().map(|item| self.entry.encode(item)).collect())
            }
            other => other.clone(),
        }
    }
}

/// A map with arbitrary string keys whose every value decodes against one
/// entry schema. The natural shape for keyed collection responses.
#[derive(Clone)]
pub struct MapSchema {
    name: String,
    entry: Arc<dyn Schema>,
}

impl MapSchema {
    pub fn new(entry: impl Schema + 'static) -> Self {
        Self::of(Arc::new(entry))
    }

    pub fn of(entry: Arc<dyn Schema>) -> Self {
        MapSchema {
            name: format!("Map<{}>", entry.name()),
            entry,
        }
    }

    pub fn into_schema(self) -> Arc<dyn Schema> {
        Arc::new(self)
    }
}

impl Schema for MapSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, input: &Value) -> Result<Value, Vec<Violation>> {
        let map = match input {
            Value::Object(map) => map,
            other => {
                return Err(vec![Violation::new(
                    "",
                    format!("expected {}, got {}", self.name, kind_of(other)),
                )])
            }
        };

        let mut violations = Vec::new();
        let mut decoded = Map::new();
        for (key, value) in map {
            match self.entry.decode(value) {
                Ok(value) => {
                    decoded.insert(key.clone(), value);
                }
                Err(nested) => {
                    let prefix = format!(".{}", key);
                    violations.extend(nested.into_iter().map(|v| v.nested(&prefix)));
                }
            }
        }

        if violations.is_empty() {
            Ok(Value::Object(decoded))
        } else {
            Err(violations)
        }
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.entry.encode(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_schema() -> ObjectSchema {
        ObjectSchema::new("User")
            .prop("name", StringSchema)
            .prop("score", NumberSchema)
    }

    #[test]
    fn primitive_schemas_accept_matching_kinds() {
        assert!(StringSchema.decode(&json!("hi")).is_ok());
        assert!(NumberSchema.decode(&json!(3)).is_ok());
        assert!(BoolSchema.decode(&json!(true)).is_ok());
        assert!(AnySchema.decode(&json!({"x": 1})).is_ok());
    }

    #[test]
    fn primitive_schemas_reject_mismatches() {
        let errs = StringSchema.decode(&json!(3)).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("expected string"));
        assert!(errs[0].message.contains("got number"));
    }

    #[test]
    fn object_schema_decodes_valid_input() {
        let decoded = user_schema()
            .decode(&json!({"name": "John", "score": 10}))
            .unwrap();
        assert_eq!(decoded, json!({"name": "John", "score": 10}));
    }

    #[test]
    fn object_schema_passes_unknown_fields_through() {
        let decoded = user_schema()
            .decode(&json!({"user_id": "1", "name": "John", "score": 10}))
            .unwrap();
        assert_eq!(decoded["user_id"], json!("1"));
    }

    #[test]
    fn object_schema_reports_missing_and_mismatched_props() {
        let errs = user_schema().decode(&json!({"name": 5})).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().any(|v| v.path == ".name"));
        assert!(errs
            .iter()
            .any(|v| v.path == ".score" && v.message.contains("missing")));
    }

    #[test]
    fn object_schema_rejects_non_objects() {
        let errs = user_schema().decode(&json!([1, 2])).unwrap_err();
        assert!(errs[0].message.contains("expected User"));
    }

    #[test]
    fn optional_props_may_be_absent() {
        let schema = ObjectSchema::new("Profile")
            .prop("name", StringSchema)
            .optional("bio", StringSchema);
        assert!(schema.decode(&json!({"name": "A"})).is_ok());
        assert!(schema.decode(&json!({"name": "A", "bio": 3})).is_err());
    }

    #[test]
    fn partial_makes_all_props_optional() {
        let partial = user_schema().partial().unwrap();
        assert_eq!(partial.name(), "Partial<User>");
        assert!(partial.decode(&json!({"name": "Alice2"})).is_ok());
        assert!(partial.decode(&json!({"name": 5})).is_err());
    }

    #[test]
    fn partial_is_passthrough_for_unstructured_schemas() {
        assert!(StringSchema.partial().is_none());
        assert!(AnySchema.partial().is_none());
    }

    #[test]
    fn array_schema_decodes_each_entry() {
        let schema = ArraySchema::new(user_schema());
        let decoded = schema
            .decode(&json!([{"name": "A", "score": 1}, {"name": "B", "score": 2}]))
            .unwrap();
        assert_eq!(decoded.as_array().unwrap().len(), 2);
    }

    #[test]
    fn array_schema_prefixes_violation_paths() {
        let schema = ArraySchema::new(user_schema());
        let errs = schema
            .decode(&json!([{"name": "A", "score": 1}, {"name": 2, "score": 2}]))
            .unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path, "[1].name");
    }

    #[test]
    fn map_schema_decodes_values() {
        let schema = MapSchema::new(NumberSchema);
        let decoded = schema.decode(&json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(decoded, json!({"a": 1, "b": 2}));

        let errs = schema.decode(&json!({"a": "x"})).unwrap_err();
        assert_eq!(errs[0].path, ".a");
    }

    #[test]
    fn encode_is_total() {
        let schema = user_schema();
        assert_eq!(
            schema.encode(&json!({"name": "A", "score": 1, "extra": true})),
            json!({"name": "A", "score": 1, "extra": true})
        );
        // Shape mismatches encode to themselves rather than failing.
        assert_eq!(schema.encode(&json!("weird")), json!("weird"));
    }

    #[test]
    fn violation_display() {
        let v = Violation::new(".name", "expected string, got number");
        assert_eq!(v.to_string(), ".name: expected string, got number");
        let root = Violation::new("", "expected User, got array");
        assert_eq!(root.to_string(), "expected User, got array");
    }
}
