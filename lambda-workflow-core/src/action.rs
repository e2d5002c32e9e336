//! # Actions (pre and post hooks)
//!
//! An action is a function over the invocation [`Context`] that runs before
//! or after the handler for its side effects: authentication, logging,
//! metrics, dependency setup. Actions run in registration order and abort the
//! invocation by returning an error.
//!
//! Closures of shape `Fn(&mut Context) -> Out` implement [`Action`] when
//! `Out` implements [`IntoOutcome`], so both of these are actions:
//!
//! ```rust,ignore
//! let audit = |ctx: &mut Context| tracing::info!(status = ctx.status_code());
//! let auth = |ctx: &mut Context| -> Result<(), BoxError> {
//!     let event = ctx.event::<ProxyRequest>()?;
//!     if event.headers.contains_key("authorization") { Ok(()) } else { Err("unauthorized".into()) }
//! };
//! ```

use crate::{context::Context, error::BoxError};
use std::sync::Arc;

/// Conversion of a handler's or action's return value into an outcome.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → success, or the error boxed
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoOutcome`",
    label = "handlers and actions must return `()` or `Result<(), E>`",
    note = "The error type must convert into `BoxError`."
)]
pub trait IntoOutcome {
    /// Convert the value into success or a boxed error.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// A side effect executed before or after the handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Action`",
    label = "missing `Action` implementation",
    note = "Actions are `Fn(&mut Context) -> ()` or `Fn(&mut Context) -> Result<(), E>`."
)]
pub trait Action: Send + Sync + 'static {
    /// Run the action against the invocation context.
    fn run(&self, ctx: &mut Context) -> Result<(), BoxError>;
}

impl<F, Out> Action for F
where
    F: Fn(&mut Context) -> Out + Send + Sync + 'static,
    Out: IntoOutcome,
{
    fn run(&self, ctx: &mut Context) -> Result<(), BoxError> {
        (self)(ctx).into_outcome()
    }
}

/// A shared, type-erased action.
pub type BoxedAction = Arc<dyn Action>;

/// Erase an action so it can be stored next to actions of other types.
pub fn boxed_action<A: Action>(action: A) -> BoxedAction {
    Arc::new(action)
}
