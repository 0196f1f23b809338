//! The per-instance resource definition.

use std::sync::Arc;

use restree_agent::Agent;
use restree_location::Location;
use restree_schema::{Schema, SchemaAdapter};

use crate::context::Options;

/// The name under which a node exposes its definition.
///
/// User specs may not declare a method or sub-resource with this name;
/// composers reject the collision at instantiation time.
pub const RESERVED_DEF_KEY: &str = "resource_def";

/// The realized, per-instance binding attached to every resource node.
///
/// Created exactly once when a specification is instantiated against a
/// context; immutable thereafter. Method implementations receive it and
/// draw the agent, the effective locations and the schema utilities from
/// it.
#[derive(Clone)]
pub struct ResourceDef {
    pub agent: Arc<dyn Agent>,
    pub options: Arc<Options>,
    /// Effective logical path.
    pub path: Location,
    /// Effective URI.
    pub uri: String,
    /// Effective store location.
    pub store: Location,
    /// The node's schema.
    pub schema: Arc<dyn Schema>,
    /// Adapter bound to the node's schema.
    pub util: SchemaAdapter,
}

impl std::fmt::Debug for ResourceDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDef")
            .field("path", &self.path)
            .field("uri", &self.uri)
            .field("store", &self.store)
            .field("schema", &self.schema.name())
            .finish()
    }
}
