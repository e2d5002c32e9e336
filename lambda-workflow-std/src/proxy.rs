//! # API Gateway Proxy Workflow
//!
//! Routes proxy requests by method and path, runs the matched handler
//! through the [`Pipeline`] and adapts its outcome into a [`ProxyResponse`].
//!
//! ```rust,ignore
//! let workflow = ProxyWorkflow::builder()
//!     .add_pre_action(LoggingAction::new())
//!     .add_get_handler("/car/{id}", get_car)
//!     .with_pre_action(require_token)
//!     .add_post_handler("/car", create_car)
//!     .build()?;
//!
//! let response = workflow.handle(request)?;
//! ```

use crate::{
    builder::WorkflowBuilder,
    pipeline::Pipeline,
    registry::HandlerEntry,
    response::{into_proxy_response, not_found},
    routing::{RouteKey, RouteTable, RouteTableBuilder, Router, RouterBuilder},
};
use lambda_workflow_core::{
    Action, Bootstrap, ErrorKind, Handler, ProxyRequest, ProxyResponse, RouterBuildError,
    WorkflowError, boxed_action, boxed_handler,
};
use std::{any::Any, fmt, sync::Arc};

type ProxyEntry = HandlerEntry<ProxyRequest>;

/// A built proxy workflow.
///
/// Immutable and cheap to clone; clones share the route table.
#[derive(Clone)]
pub struct ProxyWorkflow {
    pipeline: Pipeline,
    routes: Arc<RouteTable<ProxyEntry>>,
}

impl ProxyWorkflow {
    /// Start building a proxy workflow.
    pub fn builder() -> ProxyWorkflowBuilder {
        ProxyWorkflowBuilder::default()
    }

    /// Handle one proxy request.
    ///
    /// A request matching no route yields `404` with an empty body, without
    /// building a context or running any action.
    pub fn handle(&self, event: ProxyRequest) -> Result<ProxyResponse, WorkflowError> {
        self.dispatch(event, None::<()>)
    }

    /// Handle one proxy request, attaching the platform context
    /// (deadline, request id, ...) to the invocation context.
    pub fn handle_with<P>(
        &self,
        platform: P,
        event: ProxyRequest,
    ) -> Result<ProxyResponse, WorkflowError>
    where
        P: Any + Send + Sync,
    {
        self.dispatch(event, Some(platform))
    }

    /// Handle a JSON encoded proxy request, returning the JSON encoded response.
    pub fn handle_payload(&self, payload: &[u8]) -> Result<Vec<u8>, WorkflowError> {
        let event: ProxyRequest = serde_json::from_slice(payload)
            .map_err(|e| WorkflowError::from_source(ErrorKind::Decode, e))?;
        let response = self.handle(event)?;
        serde_json::to_vec(&response).map_err(|e| WorkflowError::from_source(ErrorKind::Encode, e))
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    fn dispatch<P>(
        &self,
        event: ProxyRequest,
        platform: Option<P>,
    ) -> Result<ProxyResponse, WorkflowError>
    where
        P: Any + Send + Sync,
    {
        let key = RouteKey::new(&event.http_method, event.path.as_str());
        let Some(entry) = self.routes.route(&key).matched() else {
            #[cfg(feature = "tracing")]
            tracing::debug!(route = %key, "no route matched");
            return Ok(not_found());
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(route = %key, "route matched");

        let ctx = self.pipeline.invoke(event, platform, entry)?;
        into_proxy_response(ctx.status_code(), ctx.into_outcome())
    }
}

impl fmt::Debug for ProxyWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyWorkflow")
            .field("pipeline", &self.pipeline)
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// Builder for [`ProxyWorkflow`].
///
/// Routes are validated by [`build`](Self::build): a malformed pattern or a
/// route registered twice fails the build unless
/// [`allow_duplicates`](Self::allow_duplicates) is set, in which case the
/// last registration wins.
#[derive(Default)]
pub struct ProxyWorkflowBuilder {
    base: WorkflowBuilder,
    routes: Vec<(RouteKey, ProxyEntry)>,
    allow_duplicates: bool,
}

impl ProxyWorkflowBuilder {
    /// Register `handler` for `method` and `path`.
    ///
    /// `path` is either a literal path or a pattern with `{name}`
    /// placeholders. Returns a builder for attaching route actions.
    pub fn add_handler<H, Args>(mut self, method: &str, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        let key = RouteKey::new(method, path);
        #[cfg(feature = "tracing")]
        tracing::trace!(route = %key, "registering handler");
        self.routes.push((key, HandlerEntry::new(boxed_handler(handler))));
        RouteBuilder { builder: self }
    }

    /// Register a `GET` handler.
    pub fn add_get_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.add_handler("GET", path, handler)
    }

    /// Register a `POST` handler.
    pub fn add_post_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.add_handler("POST", path, handler)
    }

    /// Register a `PUT` handler.
    pub fn add_put_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.add_handler("PUT", path, handler)
    }

    /// Register a `DELETE` handler.
    pub fn add_delete_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.add_handler("DELETE", path, handler)
    }

    /// Append a global action run before every handler.
    pub fn add_pre_action<A: Action>(mut self, action: A) -> Self {
        self.base = self.base.add_pre_action(action);
        self
    }

    /// Append a global action run after every handler.
    pub fn add_post_action<A: Action>(mut self, action: A) -> Self {
        self.base = self.base.add_post_action(action);
        self
    }

    /// Set the factory building the per-invocation injector.
    pub fn set_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.base = self.base.set_bootstrap(bootstrap);
        self
    }

    /// Let a later registration of the same route replace the earlier one.
    pub fn allow_duplicates(mut self) -> Self {
        self.allow_duplicates = true;
        self
    }

    /// Validate the routes and freeze the workflow.
    pub fn build(self) -> Result<ProxyWorkflow, RouterBuildError> {
        let mut table = RouteTableBuilder::default();
        if self.allow_duplicates {
            table = table.allow_duplicates();
        }
        for (key, entry) in self.routes {
            table.insert(key, entry)?;
        }
        let routes = table.build()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(routes = routes.len(), "proxy workflow built");

        Ok(ProxyWorkflow {
            pipeline: self.base.into_pipeline(),
            routes: Arc::new(routes),
        })
    }
}

impl fmt::Debug for ProxyWorkflowBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyWorkflowBuilder")
            .field("base", &self.base)
            .field("routes", &self.routes.len())
            .field("allow_duplicates", &self.allow_duplicates)
            .finish()
    }
}

/// Builder scoped to the route registered last.
///
/// Attaches route actions and forwards everything else to the
/// [`ProxyWorkflowBuilder`], so registration reads as one chain.
pub struct RouteBuilder {
    builder: ProxyWorkflowBuilder,
}

impl RouteBuilder {
    fn entry(&mut self) -> Option<&mut ProxyEntry> {
        self.builder.routes.last_mut().map(|(_, entry)| entry)
    }

    /// Append an action run before this route's handler.
    pub fn with_pre_action<A: Action>(mut self, action: A) -> Self {
        if let Some(entry) = self.entry() {
            entry.push_pre_action(boxed_action(action));
        }
        self
    }

    /// Append an action run after this route's handler.
    pub fn with_post_action<A: Action>(mut self, action: A) -> Self {
        if let Some(entry) = self.entry() {
            entry.push_post_action(boxed_action(action));
        }
        self
    }

    /// Return to the workflow builder.
    pub fn done(self) -> ProxyWorkflowBuilder {
        self.builder
    }

    /// See [`ProxyWorkflowBuilder::add_handler`].
    pub fn add_handler<H, Args>(self, method: &str, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.builder.add_handler(method, path, handler)
    }

    /// See [`ProxyWorkflowBuilder::add_get_handler`].
    pub fn add_get_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.builder.add_get_handler(path, handler)
    }

    /// See [`ProxyWorkflowBuilder::add_post_handler`].
    pub fn add_post_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.builder.add_post_handler(path, handler)
    }

    /// See [`ProxyWorkflowBuilder::add_put_handler`].
    pub fn add_put_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.builder.add_put_handler(path, handler)
    }

    /// See [`ProxyWorkflowBuilder::add_delete_handler`].
    pub fn add_delete_handler<H, Args>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Handler<ProxyRequest, Args>,
        Args: 'static,
    {
        self.builder.add_delete_handler(path, handler)
    }

    /// See [`ProxyWorkflowBuilder::add_pre_action`].
    pub fn add_pre_action<A: Action>(self, action: A) -> ProxyWorkflowBuilder {
        self.builder.add_pre_action(action)
    }

    /// See [`ProxyWorkflowBuilder::add_post_action`].
    pub fn add_post_action<A: Action>(self, action: A) -> ProxyWorkflowBuilder {
        self.builder.add_post_action(action)
    }

    /// See [`ProxyWorkflowBuilder::set_bootstrap`].
    pub fn set_bootstrap(self, bootstrap: Bootstrap) -> ProxyWorkflowBuilder {
        self.builder.set_bootstrap(bootstrap)
    }

    /// See [`ProxyWorkflowBuilder::allow_duplicates`].
    pub fn allow_duplicates(self) -> ProxyWorkflowBuilder {
        self.builder.allow_duplicates()
    }

    /// See [`ProxyWorkflowBuilder::build`].
    pub fn build(self) -> Result<ProxyWorkflow, RouterBuildError> {
        self.builder.build()
    }
}

impl From<RouteBuilder> for ProxyWorkflowBuilder {
    fn from(route: RouteBuilder) -> Self {
        route.builder
    }
}
