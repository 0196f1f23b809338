//! Consuming storables into a held [`StoreState`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use restree_location::Location;
use restree_resource::{Error, Storable, StoreOperation};
use serde_json::Value;

use crate::action::{Action, Phase};
use crate::state::{LoadState, MergeDepth, StoreState};

struct Inner {
    state: StoreState,
    actions: Vec<Action>,
}

/// A reference store dispatcher.
///
/// Holds a [`StoreState`] behind a mutex and consumes storables one at a
/// time per the consumption contract: a loading signal lands before the
/// wrapped future settles, exactly one terminal signal lands after, and
/// the underlying result is returned to the caller either way.
///
/// Derived targets cannot be resolved before the result exists, so their
/// loading signal uses the location derived from `Value::Null`.
pub struct Dispatcher {
    inner: Mutex<Inner>,
    prefix: String,
    merge_depth: MergeDepth,
}

impl Dispatcher {
    pub fn new() -> Self {
        Dispatcher {
            inner: Mutex::new(Inner {
                state: StoreState::new(),
                actions: Vec::new(),
            }),
            prefix: "rest".to_string(),
            merge_depth: MergeDepth::Shallow,
        }
    }

    /// Override the action-type prefix (default `"rest"`).
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Override how `Merge` operations recurse (default shallow).
    #[must_use]
    pub fn with_merge_depth(mut self, depth: MergeDepth) -> Self {
        self.merge_depth = depth;
        self
    }

    /// Consume one storable: signal loading, await, write, signal the
    /// terminal phase, and hand back the underlying result.
    pub async fn dispatch(&self, storable: Storable) -> Result<Value, Error> {
        let (future, spec) = storable.into_parts();

        let loading_at = spec.target.resolve(&Value::Null);
        {
            let mut inner = self.lock();
            inner
                .actions
                .push(Action::new(&self.prefix, loading_at.clone(), Phase::Loading));
            inner
                .state
                .set_load_state(loading_at.clone(), LoadState::Loading);
        }

        match future.await {
            Ok(result) => {
                let location = spec.target.resolve(&result);
                let stored = spec.project(&result);
                log::debug!(
                    "storing {:?} result at {}",
                    spec.operation,
                    location
                );
                let mut inner = self.lock();
                inner
                    .state
                    .apply(&location, &spec.operation, stored.clone(), self.merge_depth);
                inner
                    .state
                    .set_load_state(location.clone(), LoadState::Ready);
                inner.actions.push(
                    Action::new(&self.prefix, location, Phase::Ready).with_payload(stored),
                );
                Ok(result)
            }
            Err(err) => {
                let reason = err.to_string();
                log::warn!("request at {} failed: {}", loading_at, reason);
                let mut inner = self.lock();
                inner
                    .state
                    .set_load_state(loading_at.clone(), LoadState::Failed(reason.clone()));
                inner.actions.push(
                    Action::new(&self.prefix, loading_at, Phase::Failed).with_error(reason),
                );
                Err(err)
            }
        }
    }

    /// Snapshot of the held state.
    pub fn state(&self) -> StoreState {
        self.lock().state.clone()
    }

    /// The value at a location, if present.
    pub fn get(&self, location: &Location) -> Option<Value> {
        self.lock().state.get(location).cloned()
    }

    pub fn load_state(&self, location: &Location) -> Option<LoadState> {
        self.lock().state.load_state(location).cloned()
    }

    /// Every signal recorded so far, in dispatch order.
    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
