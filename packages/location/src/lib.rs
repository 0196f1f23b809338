//! Location model for restree.
//!
//! A `Location` is an ordered sequence of steps identifying a position in
//! two independent address spaces: the URI space of a REST API and the
//! addressable tree of a client-side store. A step is either a literal key
//! (`Step::Key`) or an index-step (`Step::Index`) denoting "the element
//! identified by this key within the parent collection".
//!
//! Locations are append-only values: deriving a child location never mutates
//! the parent. The same model backs both store addressing and the dotted
//! action-type identifiers used for observability.
//!
//! # Example
//!
//! ```rust
//! use restree_location::{Location, Step};
//!
//! let store = Location::new().with_key("app").with_key("users");
//! let entry = store.with_index("alice");
//!
//! assert_eq!(entry.to_string(), "app.users.alice");
//! assert!(matches!(entry.steps[2], Step::Index(_)));
//! ```

mod location;
mod uri;

pub use location::{Location, Step};
pub use uri::join_uri;
