//! Instantiation context and root options.

use std::sync::Arc;

use restree_agent::Agent;
use restree_location::{join_uri, Location};

/// Root configuration shared by every node of one instantiated tree.
#[derive(Clone, Debug)]
pub struct Options {
    /// Wrap plain method results into storables (default true). When
    /// disabled, results still await normally but carry a skip operation.
    pub storable: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { storable: true }
    }
}

/// The immutable value passed from parent to child during instantiation.
///
/// Created once at the root; every nested instantiation derives a new
/// context by appending and never mutates one in place.
#[derive(Clone)]
pub struct Context {
    pub agent: Arc<dyn Agent>,
    pub options: Arc<Options>,
    /// Logical resource path.
    pub path: Location,
    /// Concatenated URI.
    pub uri: String,
    /// Location in the external store.
    pub store: Location,
}

impl Context {
    /// The initial context: empty path and store, empty URI.
    pub fn root(agent: Arc<dyn Agent>, options: Options) -> Self {
        Context {
            agent,
            options: Arc::new(options),
            path: Location::new(),
            uri: String::new(),
            store: Location::new(),
        }
    }

    /// Derive the context for a named sub-resource: the key becomes the
    /// next step of path, uri and store alike.
    #[must_use]
    pub fn descend_key(&self, key: &str) -> Context {
        Context {
            agent: self.agent.clone(),
            options: self.options.clone(),
            path: self.path.with_key(key),
            uri: join_uri(&self.uri, key),
            store: self.store.with_key(key),
        }
    }

    /// Derive the context for a collection entry: path and store gain an
    /// index-step, the uri gains the index's string form.
    #[must_use]
    pub fn descend_index(&self, index: &str) -> Context {
        Context {
            agent: self.agent.clone(),
            options: self.options.clone(),
            path: self.path.with_index(index),
            uri: join_uri(&self.uri, index),
            store: self.store.with_index(index),
        }
    }
}
