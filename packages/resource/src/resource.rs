//! Resource specifications, constructors and composed nodes.
//!
//! A specification is pure data plus functions: it carries no runtime
//! state and may be instantiated under any number of contexts. Composing
//! it against a context yields a [`Resource`] node with its definition,
//! its merged method table, its eagerly instantiated sub-resources and,
//! when declared, an entry constructor for indexing.

use std::collections::BTreeMap;
use std::sync::Arc;

use restree_agent::Params;
use restree_location::{join_uri, Location};
use restree_schema::{Schema, SchemaAdapter};
use serde_json::Value;

use crate::context::Context;
use crate::def::{ResourceDef, RESERVED_DEF_KEY};
use crate::error::{ConfigError, Error};
use crate::methods::{collection_defaults, item_defaults, CallArgs, MethodFn, MethodResult};
use crate::storable::{Storable, StorablePartial, StoreOperation, StoreTarget};

/// Which default verb set a node carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Item,
    Collection,
}

/// The user-authored, declarative description of one node.
///
/// Fields merge over built-in defaults with field-specific rules: `uri`
/// joins by slash-normalized concatenation, `path` and `store` append,
/// `methods` and `resources` override per key. No generic deep merge.
#[derive(Clone, Default)]
pub struct ResourceSpec {
    /// Relative URI fragment appended to the inherited URI.
    pub uri: String,
    /// Extra logical path steps.
    pub path: Location,
    /// Extra store steps.
    pub store: Location,
    /// Named operations; same-named defaults are overridden.
    pub methods: BTreeMap<String, MethodFn>,
    /// Named sub-resource constructors.
    pub resources: BTreeMap<String, ResourceCtor>,
    /// Constructor for indexed entries.
    pub entry: Option<Box<ResourceCtor>>,
}

impl ResourceSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative URI fragment.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Append extra logical path steps.
    #[must_use]
    pub fn path(mut self, path: impl Into<Location>) -> Self {
        self.path = path.into();
        self
    }

    /// Append extra store steps.
    #[must_use]
    pub fn store(mut self, store: impl Into<Location>) -> Self {
        self.store = store.into();
        self
    }

    /// Declare a named method.
    #[must_use]
    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(Arc<ResourceDef>, CallArgs) -> MethodResult + Send + Sync + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    /// Declare a named sub-resource.
    #[must_use]
    pub fn resource(mut self, name: impl Into<String>, ctor: ResourceCtor) -> Self {
        self.resources.insert(name.into(), ctor);
        self
    }

    /// Declare the entry constructor for indexing.
    #[must_use]
    pub fn entry(mut self, ctor: ResourceCtor) -> Self {
        self.entry = Some(Box::new(ctor));
        self
    }
}

/// A reusable resource constructor: schema plus specification, bound to a
/// kind. Pure at definition time; `instantiate` applies a context.
#[derive(Clone)]
pub struct ResourceCtor {
    kind: ResourceKind,
    schema: Arc<dyn Schema>,
    spec: Arc<ResourceSpec>,
}

/// Define an item resource: a single addressable entity.
pub fn item(schema: Arc<dyn Schema>, spec: ResourceSpec) -> ResourceCtor {
    ResourceCtor {
        kind: ResourceKind::Item,
        schema,
        spec: Arc::new(spec),
    }
}

/// Define a collection resource: a set of entities indexable by key.
pub fn collection(schema: Arc<dyn Schema>, spec: ResourceSpec) -> ResourceCtor {
    ResourceCtor {
        kind: ResourceKind::Collection,
        schema,
        spec: Arc::new(spec),
    }
}

impl ResourceCtor {
    /// The expected schema, introspectable without instantiating.
    pub fn schema(&self) -> &Arc<dyn Schema> {
        &self.schema
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Apply a context, producing a live resource node.
    pub fn instantiate(&self, context: &Context) -> Result<Resource, Error> {
        // Effective locations: inherited context plus the spec's own
        // relative fragments, append-only.
        let uri = join_uri(&context.uri, &self.spec.uri);
        let path = context.path.join(&self.spec.path);
        let store = context.store.join(&self.spec.store);

        for key in self.spec.methods.keys() {
            if key == RESERVED_DEF_KEY {
                return Err(ConfigError::ReservedKey {
                    key: key.clone(),
                    kind: "method",
                }
                .into());
            }
        }
        for key in self.spec.resources.keys() {
            if key == RESERVED_DEF_KEY {
                return Err(ConfigError::ReservedKey {
                    key: key.clone(),
                    kind: "sub-resource",
                }
                .into());
            }
        }

        let def = Arc::new(ResourceDef {
            agent: context.agent.clone(),
            options: context.options.clone(),
            path,
            uri,
            store,
            schema: self.schema.clone(),
            util: SchemaAdapter::new(self.schema.clone()),
        });

        let defaults = match self.kind {
            ResourceKind::Item => item_defaults(),
            ResourceKind::Collection => {
                collection_defaults(self.spec.entry.as_ref().map(|e| e.schema.clone()))
            }
        };
        let mut methods: BTreeMap<String, MethodFn> = defaults
            .into_iter()
            .map(|(name, method)| (name.to_string(), method))
            .collect();
        // User declarations override same-named defaults.
        for (name, method) in &self.spec.methods {
            methods.insert(name.clone(), method.clone());
        }

        let node_context = Context {
            agent: context.agent.clone(),
            options: context.options.clone(),
            path: def.path.clone(),
            uri: def.uri.clone(),
            store: def.store.clone(),
        };

        let mut children = BTreeMap::new();
        for (key, ctor) in &self.spec.resources {
            // Children inherit the already-normalized locations.
            let child_context = node_context.descend_key(key);
            children.insert(key.clone(), ctor.instantiate(&child_context)?);
        }

        log::debug!("instantiated {:?} resource at {}", self.kind, def.uri);

        Ok(Resource {
            kind: self.kind,
            def,
            context: node_context,
            methods,
            children,
            entry: self.spec.entry.as_deref().cloned(),
        })
    }
}

/// A composed resource node.
///
/// Immutable after instantiation: the definition, method table and
/// children never change, and indexing instantiates fresh entry nodes
/// from the pure specification.
pub struct Resource {
    kind: ResourceKind,
    def: Arc<ResourceDef>,
    context: Context,
    methods: BTreeMap<String, MethodFn>,
    children: BTreeMap<String, Resource>,
    entry: Option<ResourceCtor>,
}

impl Resource {
    /// The node's resource definition.
    pub fn def(&self) -> &Arc<ResourceDef> {
        &self.def
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Names of the node's methods, defaults included.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// A named sub-resource.
    pub fn child(&self, name: &str) -> Result<&Resource, Error> {
        self.children.get(name).ok_or_else(|| {
            ConfigError::UnknownResource {
                name: name.to_string(),
                uri: self.def.uri.clone(),
            }
            .into()
        })
    }

    /// Index into the collection (or indexable item): instantiates the
    /// entry constructor with the store and path extended by an
    /// index-step and the URI extended by the index's string form.
    ///
    /// Fails synchronously with a configuration error when no entry is
    /// declared.
    pub fn at(&self, index: impl ToString) -> Result<Resource, Error> {
        let entry = self.entry.as_ref().ok_or_else(|| ConfigError::NoEntry {
            uri: self.def.uri.clone(),
        })?;
        let index = index.to_string();
        entry.instantiate(&self.context.descend_index(&index))
    }

    /// Invoke a named method with default storable decoration.
    pub fn invoke(&self, name: &str, args: CallArgs) -> Result<Storable, Error> {
        self.invoke_with(name, args, StorablePartial::new())
    }

    /// Invoke a named method, overriding parts of the storable spec.
    ///
    /// Plain results are decorated with defaults drawn from the resource
    /// definition (`location` = the node's store location, `put`,
    /// identity accessor), caller overrides winning. Already-storable
    /// results pass through unmodified. With the storable policy
    /// disabled the result still awaits normally but carries `Skip`.
    pub fn invoke_with(
        &self,
        name: &str,
        args: CallArgs,
        partial: StorablePartial,
    ) -> Result<Storable, Error> {
        let method = self.methods.get(name).ok_or_else(|| {
            ConfigError::UnknownMethod {
                name: name.to_string(),
                uri: self.def.uri.clone(),
            }
        })?;

        match method(self.def.clone(), args) {
            MethodResult::Storable(storable) => Ok(storable),
            MethodResult::Plain(future) => {
                let mut partial = partial;
                if partial.target.is_none() {
                    partial.target = Some(StoreTarget::Fixed(self.def.store.clone()));
                }
                if !self.def.options.storable {
                    partial.operation = Some(StoreOperation::Skip);
                }
                Ok(Storable::new(future, partial))
            }
        }
    }

    // Typed wrappers over the default verbs.

    pub fn head(&self, params: Params) -> Result<Storable, Error> {
        self.invoke("head", CallArgs::with_params(params))
    }

    pub fn get(&self, params: Params) -> Result<Storable, Error> {
        self.invoke("get", CallArgs::with_params(params))
    }

    /// Collection alias of `get`.
    pub fn list(&self, params: Params) -> Result<Storable, Error> {
        self.invoke("list", CallArgs::with_params(params))
    }

    pub fn put(&self, instance: Value, params: Params) -> Result<Storable, Error> {
        self.invoke("put", CallArgs::with_data_and_params(instance, params))
    }

    pub fn patch(&self, instance: Value, params: Params) -> Result<Storable, Error> {
        self.invoke("patch", CallArgs::with_data_and_params(instance, params))
    }

    pub fn delete(&self, params: Params) -> Result<Storable, Error> {
        self.invoke("delete", CallArgs::with_params(params))
    }

    pub fn post(&self, instance: Value, params: Params) -> Result<Storable, Error> {
        self.invoke("post", CallArgs::with_data_and_params(instance, params))
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind)
            .field("def", &self.def)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("indexable", &self.entry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::rest_api_with;
    use crate::context::Options;
    use crate::storable::StorableSpec;
    use restree_agent::{Method, Response, StaticAgent};
    use restree_location::Step;
    use restree_schema::{AnySchema, ArraySchema, NumberSchema, ObjectSchema, StringSchema};
    use serde_json::json;

    fn user_schema() -> Arc<dyn Schema> {
        ObjectSchema::new("User")
            .prop("name", StringSchema)
            .prop("score", NumberSchema)
            .into_schema()
    }

    fn users_ctor() -> ResourceCtor {
        let user = user_schema();
        collection(
            ArraySchema::of(user.clone()).into_schema(),
            ResourceSpec::new().entry(item(user, ResourceSpec::new())),
        )
    }

    fn root_ctor() -> ResourceCtor {
        item(
            Arc::new(AnySchema),
            ResourceSpec::new()
                .uri("/api")
                .store(["app"])
                .resource("users", users_ctor()),
        )
    }

    fn api(agent: StaticAgent) -> Resource {
        rest_api_with(Arc::new(agent), Options::default(), &root_ctor()).unwrap()
    }

    #[test]
    fn instantiation_is_deterministic() {
        let a = api(StaticAgent::new());
        let b = api(StaticAgent::new());

        let da = a.child("users").unwrap().def().clone();
        let db = b.child("users").unwrap().def().clone();
        assert_eq!(da.path, db.path);
        assert_eq!(da.uri, db.uri);
        assert_eq!(da.store, db.store);
    }

    #[test]
    fn effective_locations_append_inherited_context() {
        let api = api(StaticAgent::new());
        assert_eq!(api.def().uri, "/api");
        assert_eq!(api.def().store.to_string(), "app");

        let users = api.child("users").unwrap();
        assert_eq!(users.def().uri, "/api/users");
        assert_eq!(users.def().store.to_string(), "app.users");
        assert_eq!(users.def().path.to_string(), "users");
    }

    #[test]
    fn specs_are_reusable_across_contexts() {
        let users = users_ctor();
        let root = item(
            Arc::new(AnySchema),
            ResourceSpec::new()
                .uri("/api")
                .store(["app"])
                .resource("users", users.clone())
                .resource("admins", users),
        );
        let api = rest_api_with(Arc::new(StaticAgent::new()), Options::default(), &root).unwrap();
        assert_eq!(api.child("users").unwrap().def().uri, "/api/users");
        assert_eq!(api.child("admins").unwrap().def().uri, "/api/admins");
    }

    #[test]
    fn ctor_exposes_schema_without_instantiation() {
        assert_eq!(users_ctor().schema().name(), "Array<User>");
        assert_eq!(users_ctor().kind(), ResourceKind::Collection);
    }

    #[test]
    fn entry_indexing_extends_locations() {
        let api = api(StaticAgent::new());
        let alice = api.child("users").unwrap().at("key42").unwrap();

        assert_eq!(alice.def().uri, "/api/users/key42");
        assert_eq!(alice.def().store.last(), Some(&Step::index("key42")));
        assert_eq!(alice.def().path.last(), Some(&Step::index("key42")));
    }

    #[test]
    fn numeric_indices_stringify() {
        let api = api(StaticAgent::new());
        let entry = api.child("users").unwrap().at(42).unwrap();
        assert_eq!(entry.def().uri, "/api/users/42");
    }

    #[test]
    fn indexing_without_entry_fails_synchronously() {
        let bare = collection(Arc::new(AnySchema), ResourceSpec::new().uri("/things"));
        let node = rest_api_with(Arc::new(StaticAgent::new()), Options::default(), &bare).unwrap();

        match node.at("x") {
            Err(Error::Config(ConfigError::NoEntry { uri })) => assert_eq!(uri, "/things"),
            other => panic!("expected NoEntry, got {:?}", other),
        }
    }

    #[test]
    fn unknown_child_and_method_are_config_errors() {
        let api = api(StaticAgent::new());
        assert!(matches!(
            api.child("nope"),
            Err(Error::Config(ConfigError::UnknownResource { .. }))
        ));
        assert!(matches!(
            api.invoke("list", CallArgs::none()),
            Err(Error::Config(ConfigError::UnknownMethod { .. }))
        ));
    }

    #[test]
    fn reserved_key_is_rejected() {
        let bad = item(
            Arc::new(AnySchema),
            ResourceSpec::new().method(RESERVED_DEF_KEY, |_, _| {
                MethodResult::Plain(Box::pin(async { Ok(Value::Null) }))
            }),
        );
        let result = rest_api_with(Arc::new(StaticAgent::new()), Options::default(), &bad);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ReservedKey { .. }))
        ));

        let bad_child = item(
            Arc::new(AnySchema),
            ResourceSpec::new().resource(RESERVED_DEF_KEY, users_ctor()),
        );
        let result = rest_api_with(Arc::new(StaticAgent::new()), Options::default(), &bad_child);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::ReservedKey { .. }))
        ));
    }

    #[tokio::test]
    async fn get_decodes_against_the_node_schema() {
        let agent = StaticAgent::new().on(
            Method::GET,
            "/api/users",
            Response::ok(json!([{"user_id": "1", "name": "John", "score": 10}])),
        );
        let api = api(agent);

        let listing = api.child("users").unwrap().list(Params::new()).unwrap();
        match &listing.spec().target {
            StoreTarget::Fixed(location) => assert_eq!(location.to_string(), "app.users"),
            other => panic!("unexpected target {:?}", other),
        }
        assert!(matches!(listing.spec().operation, StoreOperation::Put));

        let decoded = listing.await.unwrap();
        assert_eq!(decoded[0]["name"], json!("John"));
        assert_eq!(decoded[0]["user_id"], json!("1"));
    }

    #[tokio::test]
    async fn get_surfaces_decode_errors() {
        let agent = StaticAgent::new().on(
            Method::GET,
            "/api/users",
            Response::ok(json!([{"name": 5}])),
        );
        let api = api(agent);

        let err = api
            .child("users")
            .unwrap()
            .get(Params::new())
            .unwrap()
            .await
            .unwrap_err();
        match err {
            Error::Decode(decode) => {
                assert!(!decode.violations.is_empty());
                assert!(decode.violations.iter().any(|v| v.path == "[0].name"));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn patch_defaults_to_the_entry_store_location() {
        let agent = StaticAgent::new().on(
            Method::PATCH,
            "/api/users/alice",
            Response::ok(json!({"user_id": "alice", "name": "Alice2", "score": 101})),
        );
        let api = api(agent);

        let patched = api
            .child("users")
            .unwrap()
            .at("alice")
            .unwrap()
            .patch(json!({"name": "Alice2"}), Params::new())
            .unwrap();

        match &patched.spec().target {
            StoreTarget::Fixed(location) => {
                assert_eq!(location.to_string(), "app.users.alice");
                assert_eq!(location.last(), Some(&Step::index("alice")));
            }
            other => panic!("unexpected target {:?}", other),
        }

        let decoded = patched.await.unwrap();
        assert_eq!(decoded["score"], json!(101));
    }

    #[tokio::test]
    async fn delete_returns_the_raw_body_and_propagates_rejections() {
        let agent = StaticAgent::new().fail_with_transport(
            Method::DELETE,
            "/api/users/bob",
            "connection reset",
        );
        let api = api(agent);

        let err = api
            .child("users")
            .unwrap()
            .at("bob")
            .unwrap()
            .delete(Params::new())
            .unwrap()
            .await
            .unwrap_err();
        match err {
            Error::Agent(agent_err) => {
                assert!(agent_err.to_string().contains("connection reset"))
            }
            other => panic!("expected agent error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn post_into_a_collection_uses_the_entry_schema() {
        let agent = StaticAgent::new().on(
            Method::POST,
            "/api/users",
            Response::ok(json!({"name": "Carol", "score": 0})),
        );
        let api = api(agent);

        let created = api
            .child("users")
            .unwrap()
            .post(json!({"name": "Carol", "score": 0}), Params::new())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(created["name"], json!("Carol"));
    }

    #[tokio::test]
    async fn user_methods_override_defaults_and_storables_pass_through() {
        let root = item(
            Arc::new(AnySchema),
            ResourceSpec::new().uri("/api").store(["app"]).method(
                "get",
                |_def, _args| {
                    MethodResult::Storable(Storable::with_spec(
                        Box::pin(async { Ok(json!("custom")) }),
                        StorablePartial::new()
                            .at(["elsewhere"])
                            .operation(StoreOperation::Merge)
                            .over(StorableSpec::defaults()),
                    ))
                },
            ),
        );
        let api = rest_api_with(Arc::new(StaticAgent::new()), Options::default(), &root).unwrap();

        // The override wins and its spec is not re-wrapped: the target
        // stays "elsewhere", not the node's store location.
        let storable = api.get(Params::new()).unwrap();
        match &storable.spec().target {
            StoreTarget::Fixed(location) => assert_eq!(location.to_string(), "elsewhere"),
            other => panic!("unexpected target {:?}", other),
        }
        assert!(matches!(storable.spec().operation, StoreOperation::Merge));
        assert_eq!(storable.await.unwrap(), json!("custom"));
    }

    #[tokio::test]
    async fn caller_overrides_win_over_decoration_defaults() {
        let agent = StaticAgent::new().on(Method::GET, "/api", Response::ok(json!({"ok": true})));
        let root = item(Arc::new(AnySchema), ResourceSpec::new().uri("/api").store(["app"]));
        let api = rest_api_with(Arc::new(agent), Options::default(), &root).unwrap();

        let storable = api
            .invoke_with(
                "get",
                CallArgs::none(),
                StorablePartial::new()
                    .at(["somewhere", "else"])
                    .operation(StoreOperation::Merge),
            )
            .unwrap();
        match &storable.spec().target {
            StoreTarget::Fixed(location) => assert_eq!(location.to_string(), "somewhere.else"),
            other => panic!("unexpected target {:?}", other),
        }
        assert!(matches!(storable.spec().operation, StoreOperation::Merge));
    }

    #[tokio::test]
    async fn disabled_storable_policy_degrades_to_skip() {
        let agent = StaticAgent::new().on(Method::GET, "/api", Response::ok(json!({"ok": true})));
        let root = item(Arc::new(AnySchema), ResourceSpec::new().uri("/api"));
        let options = Options {
            storable: false,
            ..Options::default()
        };
        let api = rest_api_with(Arc::new(agent), options, &root).unwrap();

        let storable = api.get(Params::new()).unwrap();
        assert!(matches!(storable.spec().operation, StoreOperation::Skip));
        assert_eq!(storable.await.unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn head_returns_the_raw_response() {
        let agent = StaticAgent::new().on(Method::HEAD, "/api", Response::no_content());
        let root = item(Arc::new(AnySchema), ResourceSpec::new().uri("/api"));
        let api = rest_api_with(Arc::new(agent), Options::default(), &root).unwrap();

        let response = api.head(Params::new()).unwrap().await.unwrap();
        assert_eq!(response["status"], json!(204));
    }

    #[test]
    fn item_and_collection_verb_sets_differ() {
        let api = api(StaticAgent::new());
        let root_methods: Vec<_> = api.method_names().collect();
        assert!(root_methods.contains(&"put"));
        assert!(!root_methods.contains(&"list"));

        let users = api.child("users").unwrap();
        let collection_methods: Vec<_> = users.method_names().collect();
        assert!(collection_methods.contains(&"list"));
        assert!(collection_methods.contains(&"get"));
        assert!(!collection_methods.contains(&"put"));
    }
}
