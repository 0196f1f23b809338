//! Resource composition and the storable protocol for restree.
//!
//! A declarative specification of endpoints — items and collections,
//! nested recursively — is instantiated once against a root context into
//! a tree of resource nodes. Invoking a verb on a node issues an HTTP
//! call through the agent, validates and decodes the response against the
//! node's schema, and returns a [`Storable`]: a future tagged with where
//! and how its eventual result belongs in an external store.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use restree_resource::{collection, item, rest_api, ResourceSpec};
//! use restree_schema::{ArraySchema, NumberSchema, ObjectSchema, StringSchema, AnySchema};
//!
//! let user = ObjectSchema::new("User")
//!     .prop("name", StringSchema)
//!     .prop("score", NumberSchema)
//!     .into_schema();
//!
//! let users = collection(
//!     ArraySchema::of(user.clone()).into_schema(),
//!     ResourceSpec::new().entry(item(user, ResourceSpec::new())),
//! );
//!
//! let root = item(
//!     Arc::new(AnySchema),
//!     ResourceSpec::new()
//!         .uri("/api")
//!         .store(["app"])
//!         .resource("users", users),
//! );
//!
//! let api = rest_api(Arc::new(agent), &root)?;
//!
//! // GET /api/users, decoded against Array<User>, tagged for
//! // store location app.users with a put operation.
//! let listing = api.child("users")?.list(Default::default())?;
//! let decoded = listing.await?;
//!
//! // GET /api/users/alice - an index-step extends the store location.
//! let alice = api.child("users")?.at("alice")?.get(Default::default())?;
//! ```

mod api;
mod context;
mod def;
mod error;
mod methods;
mod resource;
mod storable;

pub use api::{rest_api, rest_api_with};
pub use context::{Context, Options};
pub use def::{ResourceDef, RESERVED_DEF_KEY};
pub use error::{ConfigError, Error};
pub use methods::{CallArgs, MethodFn, MethodResult};
pub use resource::{collection, item, Resource, ResourceCtor, ResourceKind, ResourceSpec};
pub use storable::{
    Accessor, BoxFuture, Storable, StorablePartial, StorableSpec, StoreOperation, StoreTarget,
    TargetFn, Transform,
};
