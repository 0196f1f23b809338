//! The storable protocol: futures tagged with store-write instructions.
//!
//! A [`Storable`] is an ordinary future decorated with one immutable
//! [`StorableSpec`] describing how its eventual result should be written
//! into an external store. Composition instead of promise subclassing: the
//! wrapper struct is the tag, and `.await` works transparently by
//! delegation.
//!
//! The consumption contract for a store dispatcher:
//!
//! 1. signal a loading state at the spec's location before the future
//!    settles;
//! 2. on success, write `accessor(result)` at the location using the
//!    operation's semantics;
//! 3. on rejection, signal a failed state at the location carrying the
//!    reason;
//! 4. return the underlying result to the caller either way, so call
//!    sites can still await the resource-level value.
//!
//! Exactly one terminal signal per storable, never before its loading
//! signal.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use restree_location::Location;
use serde_json::Value;

use crate::error::Error;

/// A boxed future, the unit every resource method produces.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Projects a resolved value to the shape actually stored.
pub type Accessor = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Transform applied to the existing store value by `Update`.
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Derives the store location from the resolved value.
pub type TargetFn = Arc<dyn Fn(&Value) -> Location + Send + Sync>;

/// How the result is written into the store.
#[derive(Clone)]
pub enum StoreOperation {
    /// No store mutation.
    Skip,
    /// Replace the target with an invalidated placeholder.
    Clear,
    /// Wholesale replace.
    Put,
    /// Shallow-merge into the existing value (map-like targets).
    Merge,
    /// Apply a transform to the existing value.
    Update(Transform),
}

impl std::fmt::Debug for StoreOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StoreOperation::Skip => "Skip",
            StoreOperation::Clear => "Clear",
            StoreOperation::Put => "Put",
            StoreOperation::Merge => "Merge",
            StoreOperation::Update(_) => "Update(..)",
        };
        f.write_str(name)
    }
}

/// Where the result is written: a literal location, or one derived from
/// the resolved value.
#[derive(Clone)]
pub enum StoreTarget {
    Fixed(Location),
    Derived(TargetFn),
}

impl StoreTarget {
    /// Resolve against a result value.
    pub fn resolve(&self, result: &Value) -> Location {
        match self {
            StoreTarget::Fixed(location) => location.clone(),
            StoreTarget::Derived(derive) => derive(result),
        }
    }
}

impl std::fmt::Debug for StoreTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreTarget::Fixed(location) => write!(f, "Fixed({})", location),
            StoreTarget::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// The full store-write instruction attached to a storable.
#[derive(Clone)]
pub struct StorableSpec {
    pub target: StoreTarget,
    /// Projection of the resolved value; identity when absent.
    pub accessor: Option<Accessor>,
    pub operation: StoreOperation,
}

impl StorableSpec {
    /// The defaults a partial spec is merged over: root location, identity
    /// accessor, put.
    pub fn defaults() -> Self {
        StorableSpec {
            target: StoreTarget::Fixed(Location::new()),
            accessor: None,
            operation: StoreOperation::Put,
        }
    }

    /// Apply the accessor to a resolved value.
    pub fn project(&self, result: &Value) -> Value {
        match &self.accessor {
            Some(accessor) => accessor(result),
            None => result.clone(),
        }
    }
}

impl std::fmt::Debug for StorableSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorableSpec")
            .field("target", &self.target)
            .field("accessor", &self.accessor.as_ref().map(|_| "Accessor(..)"))
            .field("operation", &self.operation)
            .finish()
    }
}

/// A caller-supplied override of parts of a [`StorableSpec`].
#[derive(Clone, Default)]
pub struct StorablePartial {
    pub target: Option<StoreTarget>,
    pub accessor: Option<Accessor>,
    pub operation: Option<StoreOperation>,
}

impl StorablePartial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write at a fixed location.
    #[must_use]
    pub fn at(mut self, location: impl Into<Location>) -> Self {
        self.target = Some(StoreTarget::Fixed(location.into()));
        self
    }

    /// Write at a location derived from the resolved value.
    #[must_use]
    pub fn at_derived(
        mut self,
        derive: impl Fn(&Value) -> Location + Send + Sync + 'static,
    ) -> Self {
        self.target = Some(StoreTarget::Derived(Arc::new(derive)));
        self
    }

    /// Project the resolved value before storing.
    #[must_use]
    pub fn select(mut self, accessor: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Override the store operation.
    #[must_use]
    pub fn operation(mut self, operation: StoreOperation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Merge this partial over a base spec; set fields win.
    pub fn over(self, base: StorableSpec) -> StorableSpec {
        StorableSpec {
            target: self.target.unwrap_or(base.target),
            accessor: self.accessor.or(base.accessor),
            operation: self.operation.unwrap_or(base.operation),
        }
    }
}

/// A future decorated with store-write instructions.
///
/// Remains a valid future: awaiting it yields the same result as awaiting
/// the wrapped future. The spec is attached once at creation and is
/// immutable; derivatives produced by ordinary combinators degrade to
/// plain futures and stop being storable, which is intended.
pub struct Storable<T = Value> {
    future: BoxFuture<Result<T, Error>>,
    spec: StorableSpec,
}

impl<T> Storable<T> {
    /// Decorate a future, merging the partial spec over the defaults.
    pub fn new(future: BoxFuture<Result<T, Error>>, partial: StorablePartial) -> Self {
        Storable {
            future,
            spec: partial.over(StorableSpec::defaults()),
        }
    }

    /// Decorate a future with a complete spec.
    pub fn with_spec(future: BoxFuture<Result<T, Error>>, spec: StorableSpec) -> Self {
        Storable { future, spec }
    }

    /// The attached store-write instruction.
    pub fn spec(&self) -> &StorableSpec {
        &self.spec
    }

    /// Unwrap into the inner future and spec.
    pub fn into_parts(self) -> (BoxFuture<Result<T, Error>>, StorableSpec) {
        (self.future, self.spec)
    }
}

impl<T> Future for Storable<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // All fields are Unpin (the future itself is boxed).
        self.get_mut().future.as_mut().poll(cx)
    }
}
