//! Exact and placeholder routes combined.

use super::{
    ExactRouter, ExactRouterBuilder, PathPattern, PatternRouter, PatternRouterBuilder, RouteKey,
    RouteResult, Router, RouterBuilder,
};
use lambda_workflow_core::RouterBuildError;

/// The route table of a proxy workflow.
///
/// An exact route always wins over a placeholder route, regardless of
/// registration order. Among placeholder routes the first registered match
/// wins.
pub struct RouteTable<V> {
    exact: ExactRouter<V>,
    patterns: PatternRouter<V>,
}

impl<V> RouteTable<V> {
    /// Total number of routes.
    pub fn len(&self) -> usize {
        self.exact.len() + self.patterns.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }
}

impl<V> Router<RouteKey, V> for RouteTable<V>
where
    V: Send + Sync + 'static,
{
    fn route(&self, key: &RouteKey) -> RouteResult<'_, V> {
        match self.exact.route(key) {
            RouteResult::NotFound => self.patterns.route(key),
            matched => matched,
        }
    }
}

/// Builder for [`RouteTable`].
///
/// Keys whose path contains a `{` are parsed as patterns; all others are
/// exact routes.
pub struct RouteTableBuilder<V> {
    exact: ExactRouterBuilder<V>,
    patterns: PatternRouterBuilder<V>,
}

impl<V> RouteTableBuilder<V> {
    /// Allow duplicate keys (later insertions override earlier ones).
    pub fn allow_duplicates(self) -> Self {
        Self {
            exact: self.exact.allow_duplicates(),
            patterns: self.patterns.allow_duplicates(),
        }
    }
}

impl<V> Default for RouteTableBuilder<V> {
    fn default() -> Self {
        Self {
            exact: ExactRouterBuilder::default(),
            patterns: PatternRouterBuilder::default(),
        }
    }
}

impl<V> RouterBuilder<RouteKey, V> for RouteTableBuilder<V>
where
    V: Send + Sync + 'static,
{
    type Router = RouteTable<V>;

    fn insert(&mut self, key: RouteKey, value: V) -> Result<(), RouterBuildError> {
        if PathPattern::is_parameterized(key.path()) {
            self.patterns.insert(key, value)
        } else {
            self.exact.insert(key, value)
        }
    }

    fn build(self) -> Result<Self::Router, RouterBuildError> {
        Ok(RouteTable {
            exact: self.exact.build()?,
            patterns: self.patterns.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(routes: &[(&str, &str, i32)]) -> RouteTable<i32> {
        let mut builder = RouteTableBuilder::default();
        for (method, path, value) in routes {
            builder.insert(RouteKey::new(method, *path), *value).unwrap();
        }
        builder.build().unwrap()
    }

    fn lookup(table: &RouteTable<i32>, method: &str, path: &str) -> Option<i32> {
        table.route(&RouteKey::new(method, path)).matched().copied()
    }

    #[test]
    fn test_exact_wins_over_pattern() {
        let t = table(&[("GET", "/car/{id}", 1), ("GET", "/car/6", 2)]);

        assert_eq!(t.len(), 2);
        assert_eq!(lookup(&t, "GET", "/car/6"), Some(2));
        assert_eq!(lookup(&t, "GET", "/car/7"), Some(1));
        assert_eq!(lookup(&t, "GET", "/car"), None);
    }

    #[test]
    fn test_method_is_part_of_the_key() {
        let t = table(&[("GET", "/car/{id}", 1), ("delete", "/car/{id}", 2)]);

        assert_eq!(lookup(&t, "get", "/car/1"), Some(1));
        assert_eq!(lookup(&t, "DELETE", "/car/1"), Some(2));
        assert_eq!(lookup(&t, "PUT", "/car/1"), None);
    }

    #[test]
    fn test_root_and_empty_are_distinct() {
        let t = table(&[("GET", "/", 1)]);
        assert_eq!(lookup(&t, "GET", "/"), Some(1));
        assert_eq!(lookup(&t, "GET", ""), None);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut builder: RouteTableBuilder<i32> = RouteTableBuilder::default();
        assert!(matches!(
            builder.insert(RouteKey::new("GET", "/car/{}"), 1),
            Err(RouterBuildError::InvalidPattern { .. })
        ));
    }
}
