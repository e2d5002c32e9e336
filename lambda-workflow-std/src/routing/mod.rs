//! # Routing
//!
//! Resolves an inbound `(method, path)` pair to a registered value.
//!
//! - [`ExactRouter`] - literal paths, backed by a `HashMap`
//! - [`PatternRouter`] - paths with `{name}` placeholders, scanned in
//!   registration order
//! - [`RouteTable`] - both combined: exact matches always win, then the first
//!   registered matching pattern
//!
//! Routers are built through [`RouterBuilder`] and are immutable afterwards.

mod exact;
mod pattern;
mod table;

pub use exact::{ExactRouter, ExactRouterBuilder};
pub use pattern::{PathPattern, PatternRouter, PatternRouterBuilder};
pub use table::{RouteTable, RouteTableBuilder};

use lambda_workflow_core::RouterBuildError;
use std::fmt;

/// Result of a routing lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResult<'a, V> {
    /// Route matched, contains the value.
    Matched(&'a V),
    /// No matching route found.
    NotFound,
}

impl<'a, V> RouteResult<'a, V> {
    /// Returns true if the route was matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, RouteResult::Matched(_))
    }

    /// Returns the matched value, if any.
    pub fn matched(self) -> Option<&'a V> {
        match self {
            RouteResult::Matched(v) => Some(v),
            RouteResult::NotFound => None,
        }
    }
}

/// A router that maps keys to values.
pub trait Router<K: ?Sized, V>: Send + Sync + 'static {
    /// Look up a value by key.
    fn route(&self, key: &K) -> RouteResult<'_, V>;

    /// Check if a key exists in the router.
    fn contains(&self, key: &K) -> bool {
        self.route(key).is_matched()
    }
}

/// Builder for constructing routers.
pub trait RouterBuilder<K, V>: Default + Send {
    /// The router type this builder produces.
    type Router: Router<K, V>;

    /// Insert a key-value pair into the router.
    ///
    /// Returns an error if the key already exists and duplicates are not
    /// allowed.
    fn insert(&mut self, key: K, value: V) -> Result<(), RouterBuildError>;

    /// Build the router, consuming the builder.
    fn build(self) -> Result<Self::Router, RouterBuildError>;
}

/// A normalized HTTP method plus a literal path or path pattern.
///
/// The method is stored uppercase; the path is kept exactly as given, so
/// `""` and `"/"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    method: String,
    path: String,
}

impl RouteKey {
    /// Create a key, normalizing the method.
    pub fn new(method: &str, path: impl Into<String>) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: path.into(),
        }
    }

    /// The uppercase method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The path or pattern.
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
