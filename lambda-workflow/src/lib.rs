//! # lambda-workflow - Typed Handlers for API Gateway Lambda Functions
//!
//! `lambda-workflow` routes API Gateway proxy requests to plain Rust
//! functions, decodes the request into the type each handler declares, runs
//! ordered pre and post actions around the call, and turns what the handler
//! set on the [`Context`] back into the wire response.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lambda_workflow::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Car {
//!     id: String,
//!     model: String,
//! }
//!
//! fn get_car(ctx: &mut Context, Json(car): Json<Car>) -> Result<(), BoxError> {
//!     // `id` comes from the `{id}` path parameter.
//!     ctx.set_response(car).set_status_code(200);
//!     Ok(())
//! }
//!
//! let workflow = ProxyWorkflow::builder()
//!     .add_pre_action(LoggingAction::new())
//!     .add_get_handler("/car/{id}", get_car)
//!     .build()?;
//!
//! let response = workflow.handle(request)?;
//! ```
//!
//! ## Routing
//!
//! Exact routes always win over `{param}` routes. Among `{param}` routes the
//! first one registered wins. A request matching no route gets `404` with an
//! empty body and runs no action.
//!
//! ## Features
//!
//! - `tracing` (default): debug and warn events from the routing and the
//!   pipeline, and structured output for [`LoggingAction`](hooks::LoggingAction).

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use lambda_workflow_core::{
    // Actions
    Action,
    // Wire types
    AuthorizerRequest,
    AuthorizerResponse,
    // Injection
    Bootstrap,
    BoxError,
    BoxedAction,
    BoxedHandler,
    // Context
    Context,
    Dependency,
    ErasedHandler,
    // Errors
    ErrorKind,
    // Extraction
    Event,
    FromEvent,
    // Handlers
    Handler,
    Injector,
    IntoOutcome,
    Json,
    JsonBody,
    // Message
    Message,
    Outcome,
    PolicyDocument,
    PolicyStatement,
    ProxyRequest,
    ProxyResponse,
    ResolveError,
    RouterBuildError,
    Stack,
    TypedResponse,
    WorkflowError,
    bootstrap,
    boxed_action,
    boxed_handler,
    merged_payload,
};

// Workflows
pub use lambda_workflow_std::{
    authorizer::{AuthorizerHandlerBuilder, AuthorizerWorkflow, AuthorizerWorkflowBuilder},
    builder::WorkflowBuilder,
    pipeline::{Pipeline, Stage},
    proxy::{ProxyWorkflow, ProxyWorkflowBuilder, RouteBuilder},
    registry::HandlerEntry,
};

/// Route tables and the router traits.
pub mod routing {
    pub use lambda_workflow_std::routing::{
        ExactRouter, ExactRouterBuilder, PathPattern, PatternRouter, PatternRouterBuilder,
        RouteKey, RouteResult, RouteTable, RouteTableBuilder, Router, RouterBuilder,
    };
}

/// Response adapters.
pub mod response {
    pub use lambda_workflow_std::response::{
        NOT_FOUND, into_authorizer_response, into_proxy_response, not_found,
    };
}

/// Standard action implementations.
pub mod hooks {
    #![allow(clippy::wildcard_imports)]
    pub use lambda_workflow_std::hooks::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use lambda_workflow_std::testing::*;
}

/// Prelude module - common imports for lambda-workflow.
///
/// # Usage
///
/// ```rust,ignore
/// use lambda_workflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Actions
        Action,
        AuthorizerRequest,
        AuthorizerResponse,
        AuthorizerWorkflow,
        // Errors
        BoxError,
        // Core types
        Context,
        Event,
        Injector,
        Json,
        JsonBody,
        ProxyRequest,
        ProxyResponse,
        // Workflows
        ProxyWorkflow,
        WorkflowError,
        bootstrap,
        hooks::LoggingAction,
    };
}
