//! Error types for lambda-workflow.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`WorkflowError`] - The single error value that crosses the pipeline boundary
//! - [`RouterBuildError`] - Configuration errors raised while building a workflow
//! - [`ResolveError`] - Failures of the per-invocation [`Injector`](crate::Injector)

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
///
/// Handlers and actions return user errors through this alias.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The stage or contract that produced a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The event payload could not be decoded into the handler input.
    Decode,
    /// The typed response could not be encoded.
    Encode,
    /// A pre or post action failed.
    Action,
    /// The handler returned an error.
    Handler,
    /// A dependency could not be resolved from the injector.
    Resolve,
    /// An internal contract was violated (type mismatch, invalid raw response, ...).
    Contract,
}

impl ErrorKind {
    /// Short lowercase name, used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::Encode => "encode",
            ErrorKind::Action => "action",
            ErrorKind::Handler => "handler",
            ErrorKind::Resolve => "resolve",
            ErrorKind::Contract => "contract",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error surfaced by a workflow invocation.
///
/// Carries a human readable message, the stack captured where the error was
/// raised, and the original cause when there is one. The message of an error
/// built from a cause is the cause's own message, so a handler returning
/// `"not allowed"` fails the invocation with `"not allowed"`.
///
/// See [`Stack`] for when the stack is recorded.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct WorkflowError {
    kind: ErrorKind,
    message: String,
    stack: Stack,
    #[source]
    source: Option<BoxError>,
}

impl WorkflowError {
    /// Create an error with a message and no underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: Stack::capture(kind),
            source: None,
        }
    }

    /// Create an error wrapping `source`, reusing its message.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            kind,
            message: source.to_string(),
            stack: Stack::capture(kind),
            source: Some(source),
        }
    }

    /// Create an error with its own message wrapping `source`.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: Stack::capture(kind),
            source: Some(source.into()),
        }
    }

    /// Shorthand for a [`ErrorKind::Contract`] error.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Contract, message)
    }

    /// The error category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The stack captured when the error was created.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The original error, if this error wraps one.
    pub fn original_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Consume the error and return the original cause.
    pub fn into_original_error(self) -> Option<BoxError> {
        self.source
    }

    /// Returns true for internal contract violations.
    pub fn is_contract_violation(&self) -> bool {
        self.kind == ErrorKind::Contract
    }
}

/// The stack captured when a [`WorkflowError`] is created.
///
/// Decode failures and contract violations always record the stack. Other
/// kinds only do so when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables
/// it.
pub struct Stack(Backtrace);

impl Stack {
    fn capture(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Decode | ErrorKind::Contract => Self(Backtrace::force_capture()),
            _ => Self(Backtrace::capture()),
        }
    }

    /// The underlying backtrace.
    pub fn backtrace(&self) -> &Backtrace {
        &self.0
    }

    /// Returns true if frames were actually recorded.
    pub fn is_captured(&self) -> bool {
        self.0.status() == BacktraceStatus::Captured
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors raised while building a workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterBuildError {
    /// A route was registered twice and duplicates are not allowed.
    #[error("duplicate route: {0}")]
    DuplicateKey(String),

    /// A path pattern could not be parsed.
    #[error("invalid path pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The workflow could not be built.
    #[error("build failed: {0}")]
    BuildFailed(String),
}

/// Errors returned by an [`Injector`](crate::Injector).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No provider is registered for the requested type.
    #[error("no provider registered for type {0}")]
    NotRegistered(&'static str),

    /// No provider is registered under the requested name.
    #[error("no provider registered with name `{0}`")]
    NameNotRegistered(String),

    /// A provider exists but holds a value of another type.
    #[error("dependency `{name}` is not of type {expected}")]
    TypeMismatch {
        /// Type name or registration name that was looked up.
        name: String,
        /// The type the caller asked for.
        expected: &'static str,
    },

    /// The workflow has no bootstrap, so there is no injector to resolve from.
    #[error("no injector available: the workflow has no bootstrap")]
    NoInjector,
}

impl From<ResolveError> for WorkflowError {
    fn from(err: ResolveError) -> Self {
        WorkflowError::from_source(ErrorKind::Resolve, err)
    }
}
