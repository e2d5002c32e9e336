//! Exact-match routes.

use super::{RouteKey, RouteResult, Router, RouterBuilder};
use lambda_workflow_core::RouterBuildError;
use std::collections::HashMap;

/// Routes literal `(method, path)` keys, backed by `HashMap`.
pub struct ExactRouter<V> {
    map: HashMap<RouteKey, V>,
}

impl<V> ExactRouter<V> {
    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the router is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<V> Router<RouteKey, V> for ExactRouter<V>
where
    V: Send + Sync + 'static,
{
    fn route(&self, key: &RouteKey) -> RouteResult<'_, V> {
        match self.map.get(key) {
            Some(v) => RouteResult::Matched(v),
            None => RouteResult::NotFound,
        }
    }
}

/// Builder for [`ExactRouter`].
pub struct ExactRouterBuilder<V> {
    map: HashMap<RouteKey, V>,
    allow_duplicates: bool,
}

impl<V> ExactRouterBuilder<V> {
    /// Allow duplicate keys (later insertions override earlier ones).
    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }
}

impl<V> Default for ExactRouterBuilder<V> {
    fn default() -> Self {
        Self {
            map: HashMap::new(),
            allow_duplicates: false,
        }
    }
}

impl<V> RouterBuilder<RouteKey, V> for ExactRouterBuilder<V>
where
    V: Send + Sync + 'static,
{
    type Router = ExactRouter<V>;

    fn insert(&mut self, key: RouteKey, value: V) -> Result<(), RouterBuildError> {
        if !self.allow_duplicates && self.map.contains_key(&key) {
            return Err(RouterBuildError::DuplicateKey(key.to_string()));
        }
        self.map.insert(key, value);
        Ok(())
    }

    fn build(self) -> Result<Self::Router, RouterBuildError> {
        Ok(ExactRouter { map: self.map })
    }
}
