//! REST API root: the entry point that instantiates a resource tree.

use std::sync::Arc;

use restree_agent::Agent;

use crate::context::{Context, Options};
use crate::error::Error;
use crate::resource::{Resource, ResourceCtor};

/// Instantiate a resource tree with default options.
///
/// Builds the initial context (empty path, empty URI, empty store
/// location) and applies the root constructor to it.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use restree_resource::{collection, item, rest_api, ResourceSpec};
///
/// let users = collection(
///     user_list_schema,
///     ResourceSpec::new().entry(item(user_schema, ResourceSpec::new())),
/// );
/// let root = item(
///     AnySchema into schema,
///     ResourceSpec::new().uri("/api").store(["app"]).resource("users", users),
/// );
///
/// let api = rest_api(Arc::new(agent), &root)?;
/// let listing = api.child("users")?.list(Default::default())?;
/// ```
pub fn rest_api(agent: Arc<dyn Agent>, root: &ResourceCtor) -> Result<Resource, Error> {
    rest_api_with(agent, Options::default(), root)
}

/// Instantiate a resource tree with explicit options.
pub fn rest_api_with(
    agent: Arc<dyn Agent>,
    options: Options,
    root: &ResourceCtor,
) -> Result<Resource, Error> {
    let context = Context::root(agent, options);
    root.instantiate(&context)
}
