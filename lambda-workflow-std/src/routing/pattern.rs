//! Placeholder routes such as `/car/{id}`.

use super::{RouteKey, RouteResult, Router, RouterBuilder};
use lambda_workflow_core::RouterBuildError;
use regex::Regex;
use std::fmt;

/// A parsed path pattern.
///
/// Each `{name}` placeholder is a greedy wildcard: it matches any run of
/// characters, `/` and the empty run included. Everything else matches
/// literally and the pattern is anchored at both ends of the path.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    params: Vec<String>,
    regex: Regex,
}

impl PathPattern {
    /// Parse `pattern`.
    ///
    /// Fails on an unterminated placeholder, an empty placeholder name or a
    /// name containing `/` or `{`.
    pub fn parse(pattern: &str) -> Result<Self, RouterBuildError> {
        let invalid = |reason: &str| RouterBuildError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let mut params = Vec::new();
        let mut expr = String::from("^");
        let mut rest = pattern;
        while let Some(open) = rest.find('{') {
            expr.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| invalid("unterminated placeholder"))?;
            let name = &after[..close];
            if name.is_empty() {
                return Err(invalid("empty placeholder name"));
            }
            if name.contains(['/', '{']) {
                return Err(invalid("placeholder name contains `/` or `{`"));
            }
            params.push(name.to_string());
            expr.push_str("(.*)");
            rest = &after[close + 1..];
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            source: pattern.to_string(),
            params,
            regex,
        })
    }

    /// Returns true if `path` contains at least one placeholder.
    pub fn is_parameterized(path: &str) -> bool {
        path.contains('{')
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names, in order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(String::as_str)
    }

    /// Returns true if the whole of `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct PatternRoute<V> {
    method: String,
    pattern: PathPattern,
    value: V,
}

/// Routes placeholder patterns in registration order; the first match wins.
pub struct PatternRouter<V> {
    routes: Vec<PatternRoute<V>>,
}

impl<V> PatternRouter<V> {
    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the router is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<V> Router<RouteKey, V> for PatternRouter<V>
where
    V: Send + Sync + 'static,
{
    fn route(&self, key: &RouteKey) -> RouteResult<'_, V> {
        self.routes
            .iter()
            .find(|route| route.method == key.method() && route.pattern.matches(key.path()))
            .map_or(RouteResult::NotFound, |route| {
                RouteResult::Matched(&route.value)
            })
    }
}

/// Builder for [`PatternRouter`].
pub struct PatternRouterBuilder<V> {
    routes: Vec<PatternRoute<V>>,
    allow_duplicates: bool,
}

impl<V> PatternRouterBuilder<V> {
    /// Allow duplicate keys.
    ///
    /// A re-registered pattern replaces the earlier value but keeps its
    /// original position in the scan order.
    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }
}

impl<V> Default for PatternRouterBuilder<V> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            allow_duplicates: false,
        }
    }
}

impl<V> RouterBuilder<RouteKey, V> for PatternRouterBuilder<V>
where
    V: Send + Sync + 'static,
{
    type Router = PatternRouter<V>;

    fn insert(&mut self, key: RouteKey, value: V) -> Result<(), RouterBuildError> {
        let pattern = PathPattern::parse(key.path())?;
        let existing = self
            .routes
            .iter_mut()
            .find(|route| route.method == key.method() && route.pattern == pattern);

        match existing {
            Some(_) if !self.allow_duplicates => {
                Err(RouterBuildError::DuplicateKey(key.to_string()))
            }
            Some(route) => {
                route.value = value;
                Ok(())
            }
            None => {
                self.routes.push(PatternRoute {
                    method: key.method().to_string(),
                    pattern,
                    value,
                });
                Ok(())
            }
        }
    }

    fn build(self) -> Result<Self::Router, RouterBuildError> {
        Ok(PatternRouter {
            routes: self.routes,
        })
    }
}
