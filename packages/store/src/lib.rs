//! Reference store integration for restree.
//!
//! A [`Dispatcher`] consumes storables per the consumption contract: it
//! signals a loading state at the storable's location before the future
//! settles, applies the store operation on success, signals a failed
//! state on rejection, and returns the underlying result either way so
//! call sites can still await the resource-level value.
//!
//! State lives in a JSON value tree addressed by `Location` (index-steps
//! address map keys by their string form). Every signal is also recorded
//! as an [`Action`] with a stable type identifier of the form
//! `"<prefix>:<location joined by dots>:<loading|ready|failed>"`.

mod action;
mod dispatcher;
mod state;

pub use action::{action_kind, Action, Phase};
pub use dispatcher::Dispatcher;
pub use state::{LoadState, MergeDepth, StoreState};
