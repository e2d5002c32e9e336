//! # lambda-workflow-std
//!
//! Standard implementations for the lambda-workflow handler framework.
//!
//! This crate provides:
//! - **Routing**: [`RouteTable`](routing::RouteTable) over exact and `{param}` routes
//! - **Pipeline**: [`Pipeline`](pipeline::Pipeline), the staged handler invocation
//! - **Workflows**: [`ProxyWorkflow`](proxy::ProxyWorkflow) and
//!   [`AuthorizerWorkflow`](authorizer::AuthorizerWorkflow) with their builders
//! - **Response adapters**: [`response`]
//! - **Standard actions**: Logging, Conditional, Branch
//! - **Testing utilities**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use lambda_workflow_core;

// Modules
pub mod authorizer;
pub mod builder;
pub mod hooks;
pub mod pipeline;
pub mod proxy;
pub mod registry;
pub mod response;
pub mod routing;
pub mod testing;
