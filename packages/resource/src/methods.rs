//! Method shape and the built-in verb sets.
//!
//! Every resource method, default verbs included, is a function of the
//! node's resource definition plus call arguments, returning either a
//! plain future (to be decorated into a storable) or an already-storable
//! result (passed through unmodified).

use std::sync::Arc;

use restree_agent::{Params, Response};
use restree_schema::Schema;
use serde_json::{json, Value};

use crate::def::ResourceDef;
use crate::error::Error;
use crate::storable::{BoxFuture, Storable};

/// Arguments to one method invocation.
#[derive(Clone, Debug, Default)]
pub struct CallArgs {
    /// The instance payload for body-carrying verbs.
    pub data: Option<Value>,
    /// Query parameters.
    pub params: Params,
}

impl CallArgs {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_params(params: Params) -> Self {
        CallArgs {
            data: None,
            params,
        }
    }

    pub fn with_data(data: Value) -> Self {
        CallArgs {
            data: Some(data),
            params: Params::new(),
        }
    }

    pub fn with_data_and_params(data: Value, params: Params) -> Self {
        CallArgs {
            data: Some(data),
            params,
        }
    }
}

/// What a method produces.
///
/// A closed enum: anything a method can return is decoratable, so the
/// "unsupported result" failure mode cannot arise.
pub enum MethodResult {
    /// An undecorated future; the composer wraps it per storable policy.
    Plain(BoxFuture<Result<Value, Error>>),
    /// An already-storable result; passed through without re-wrapping.
    Storable(Storable),
}

/// A resource method: invoked with the node's definition and the call
/// arguments.
pub type MethodFn = Arc<dyn Fn(Arc<ResourceDef>, CallArgs) -> MethodResult + Send + Sync>;

fn plain(
    fut: impl std::future::Future<Output = Result<Value, Error>> + Send + 'static,
) -> MethodResult {
    MethodResult::Plain(Box::pin(fut))
}

/// Raw response as a value, for verbs that skip decoding.
fn raw(response: Response) -> Value {
    json!({ "status": response.status, "data": response.data })
}

/// `head`: raw response, no decode.
pub fn head_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let response = def.agent.head(&def.uri, &args.params).await?;
            Ok(raw(response))
        })
    })
}

/// `get`: parse then decode against the node's schema.
pub fn get_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let response = def.agent.get(&def.uri, &args.params).await?;
            match def.util.parse(response.status, &response.data) {
                Some(body) => Ok(def.util.decode(&body)?),
                None => Ok(Value::Null),
            }
        })
    })
}

/// `put`: encode the instance, issue PUT, decode the response.
pub fn put_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let instance = args.data.unwrap_or(Value::Null);
            let body = def.util.encode(&instance);
            let response = def.agent.put(&def.uri, body, &args.params).await?;
            match def.util.parse(response.status, &response.data) {
                Some(body) => Ok(def.util.decode(&body)?),
                None => Ok(Value::Null),
            }
        })
    })
}

/// `patch`: encode with the full schema, decode the response with the
/// partial variant (decode leniency, not encode).
pub fn patch_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let instance = args.data.unwrap_or(Value::Null);
            let body = def.util.encode(&instance);
            let partial = def.util.partial();
            let response = def.agent.patch(&def.uri, body, &args.params).await?;
            match partial.parse(response.status, &response.data) {
                Some(body) => Ok(partial.decode(&body)?),
                None => Ok(Value::Null),
            }
        })
    })
}

/// `delete`: raw response body, no decode — deletion responses are not
/// assumed to carry a decodable entity.
pub fn delete_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let response = def.agent.delete(&def.uri, &args.params).await?;
            Ok(response.data)
        })
    })
}

/// `post` against the node's own schema (item resources).
pub fn post_verb() -> MethodFn {
    Arc::new(|def, args| {
        plain(async move {
            let instance = args.data.unwrap_or(Value::Null);
            let body = def.util.encode(&instance);
            let response = def.agent.post(&def.uri, body, &args.params).await?;
            match def.util.parse(response.status, &response.data) {
                Some(body) => Ok(def.util.decode(&body)?),
                None => Ok(Value::Null),
            }
        })
    })
}

/// `post` into a collection: a collection's POST creates one new entry,
/// so both the request body and the response validate against the entry
/// schema, not the collection schema.
pub fn post_entry_verb(entry_schema: Option<Arc<dyn Schema>>) -> MethodFn {
    Arc::new(move |def, args| {
        let entry_schema = entry_schema.clone();
        plain(async move {
            let util = match entry_schema {
                Some(schema) => def.util.with(schema),
                None => def.util.clone(),
            };
            let instance = args.data.unwrap_or(Value::Null);
            let body = util.encode(&instance);
            let response = def.agent.post(&def.uri, body, &args.params).await?;
            match util.parse(response.status, &response.data) {
                Some(body) => Ok(util.decode(&body)?),
                None => Ok(Value::Null),
            }
        })
    })
}

/// Default verbs of an item resource.
pub fn item_defaults() -> Vec<(&'static str, MethodFn)> {
    vec![
        ("head", head_verb()),
        ("get", get_verb()),
        ("put", put_verb()),
        ("patch", patch_verb()),
        ("delete", delete_verb()),
        ("post", post_verb()),
    ]
}

/// Default verbs of a collection resource. `list` and `get` are aliases.
pub fn collection_defaults(entry_schema: Option<Arc<dyn Schema>>) -> Vec<(&'static str, MethodFn)> {
    vec![
        ("head", head_verb()),
        ("get", get_verb()),
        ("list", get_verb()),
        ("post", post_entry_verb(entry_schema)),
    ]
}
