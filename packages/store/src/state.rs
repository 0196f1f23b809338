//! The value tree and load-state bookkeeping.

use std::collections::HashMap;

use restree_location::{Location, Step};
use restree_resource::StoreOperation;
use serde_json::{Map, Value};

/// Per-location request state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// How `merge` recurses.
///
/// Shallow is the default: key-wise merge of the top-level object, values
/// replaced wholesale. Deep recurses through nested object/object pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeDepth {
    #[default]
    Shallow,
    Deep,
}

/// Store state: a JSON value tree plus per-location load states.
///
/// Index-steps address map keys by their string form. Writing through a
/// missing or non-container intermediate creates an object there, the
/// forgiving behavior expected of a store reducer.
#[derive(Clone, Debug, Default)]
pub struct StoreState {
    root: Value,
    load_states: HashMap<Location, LoadState>,
}

impl StoreState {
    pub fn new() -> Self {
        StoreState {
            root: Value::Null,
            load_states: HashMap::new(),
        }
    }

    /// The whole tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Read the value at a location.
    pub fn get(&self, location: &Location) -> Option<&Value> {
        get_at(&self.root, location)
    }

    /// Apply one store operation at a location.
    pub fn apply(
        &mut self,
        location: &Location,
        operation: &StoreOperation,
        value: Value,
        depth: MergeDepth,
    ) {
        match operation {
            StoreOperation::Skip => {}
            StoreOperation::Clear => set_at(&mut self.root, location, Value::Null),
            StoreOperation::Put => set_at(&mut self.root, location, value),
            StoreOperation::Merge => {
                let mut target = self.get(location).cloned().unwrap_or(Value::Null);
                merge_value(&mut target, value, depth);
                set_at(&mut self.root, location, target);
            }
            StoreOperation::Update(transform) => {
                let existing = self.get(location).cloned().unwrap_or(Value::Null);
                set_at(&mut self.root, location, transform(existing));
            }
        }
    }

    pub fn set_load_state(&mut self, location: Location, state: LoadState) {
        self.load_states.insert(location, state);
    }

    pub fn load_state(&self, location: &Location) -> Option<&LoadState> {
        self.load_states.get(location)
    }
}

fn get_at<'a>(root: &'a Value, location: &Location) -> Option<&'a Value> {
    let mut current = root;
    for step in location.iter() {
        current = match current {
            Value::Object(map) => map.get(step.as_str())?,
            Value::Array(items) => {
                let index: usize = step.as_str().parse().ok()?;
                items.get(index)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn set_at(root: &mut Value, location: &Location, value: Value) {
    let steps: Vec<&Step> = location.iter().collect();
    set_steps(root, &steps, value);
}

fn set_steps(current: &mut Value, steps: &[&Step], value: Value) {
    let Some((step, rest)) = steps.split_first() else {
        *current = value;
        return;
    };
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        let entry = map.entry(step.as_str().to_string()).or_insert(Value::Null);
        set_steps(entry, rest, value);
    }
}

fn merge_value(target: &mut Value, source: Value, depth: MergeDepth) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_value) in source_map {
                match (depth, target_map.get_mut(&key)) {
                    (MergeDepth::Deep, Some(existing)) => {
                        merge_value(existing, source_value, depth);
                    }
                    _ => {
                        target_map.insert(key, source_value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
