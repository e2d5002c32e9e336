//! # lambda-workflow-core
//!
//! Core contracts for the lambda-workflow handler framework.
//!
//! This crate has minimal dependencies and holds everything a handler or an
//! action touches. Routing, the invocation pipeline and the workflows live in
//! `lambda-workflow-std`.
//!
//! # Building Blocks
//!
//! ## Actions ([`Action`])
//!
//! Functions over the invocation context, run before or after the handler
//! in registration order. Returning an error aborts the invocation.
//!
//! ## Context ([`Context`])
//!
//! Per-invocation state: the original event, the decoded request, the
//! response [`Outcome`] and status code, the handler error and the injector.
//!
//! ## Handlers ([`Handler`])
//!
//! User functions of shape `Fn(&mut Context)` or `Fn(&mut Context, T)`,
//! where `T` is decoded from the event through [`FromEvent`].
//!
//! ## Injection ([`Injector`])
//!
//! The contract of a dependency container, built per invocation by a
//! [`Bootstrap`] factory.
//!
//! # Error Types
//!
//! - [`WorkflowError`] - Error surfaced by an invocation
//! - [`RouterBuildError`] - Configuration errors
//! - [`ResolveError`] - Injector failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod action;
mod context;
mod error;
mod event;
mod extract;
mod handler;
mod injector;
mod message;

// Re-exports
pub use action::{Action, BoxedAction, IntoOutcome, boxed_action};
pub use context::{Context, Outcome, TypedResponse};
pub use error::{BoxError, ErrorKind, ResolveError, RouterBuildError, Stack, WorkflowError};
pub use event::{
    AuthorizerRequest, AuthorizerResponse, PolicyDocument, PolicyStatement, ProxyRequest,
    ProxyResponse,
};
pub use extract::{Event, FromEvent, Json, JsonBody, merged_payload};
pub use handler::{BoxedHandler, ErasedHandler, Handler, boxed_handler};
pub use injector::{Bootstrap, Dependency, Injector, bootstrap};
pub use message::Message;
