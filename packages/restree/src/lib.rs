//! restree: declarative REST resource trees with store-aware results.
//!
//! A nested specification of items and collections is instantiated once
//! against an agent into a tree of resource nodes. Invoking a verb on a
//! node issues the HTTP call, decodes the response against the node's
//! schema, and returns a storable: a future tagged with where and how
//! its result belongs in an external store. A dispatcher consumes
//! storables into a held state tree, signalling loading, ready and
//! failed phases along the way.

pub use restree_agent as agent;
pub use restree_location as location;
pub use restree_resource as resource;
pub use restree_schema as schema;
pub use restree_store as store;

pub use restree_agent::{Agent, AgentError, HttpAgent, Method, Params, Response};
pub use restree_location::{join_uri, Location, Step};
pub use restree_resource::{
    collection, item, rest_api, rest_api_with, CallArgs, ConfigError, Error, MethodResult,
    Options, Resource, ResourceCtor, ResourceKind, ResourceSpec, Storable, StorablePartial,
    StorableSpec, StoreOperation, StoreTarget,
};
pub use restree_schema::{
    AnySchema, ArraySchema, BoolSchema, DecodeError, MapSchema, NumberSchema, ObjectSchema,
    Schema, SchemaAdapter, StringSchema, Violation,
};
pub use restree_store::{action_kind, Action, Dispatcher, LoadState, MergeDepth, Phase, StoreState};
