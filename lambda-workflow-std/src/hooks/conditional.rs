//! Conditional actions.

use lambda_workflow_core::{Action, BoxError, Context};

/// Runs the inner action only when `condition(ctx)` returns `true`.
///
/// # Example
///
/// ```rust,ignore
/// // Only audit failed invocations.
/// let audit_failures = ConditionalAction::new(
///     |ctx: &Context| ctx.handler_error().is_some(),
///     AuditAction,
/// );
/// ```
pub struct ConditionalAction<C, A> {
    condition: C,
    inner: A,
}

impl<C, A> ConditionalAction<C, A> {
    /// Create a new `ConditionalAction`.
    pub fn new(condition: C, inner: A) -> Self {
        Self { condition, inner }
    }
}

impl<C, A> Action for ConditionalAction<C, A>
where
    C: Fn(&Context) -> bool + Send + Sync + 'static,
    A: Action,
{
    fn run(&self, ctx: &mut Context) -> Result<(), BoxError> {
        if (self.condition)(ctx) {
            self.inner.run(ctx)
        } else {
            Ok(())
        }
    }
}

/// Runs one of two actions depending on `condition(ctx)`.
pub struct BranchAction<C, T, E> {
    condition: C,
    then_action: T,
    else_action: E,
}

impl<C, T, E> BranchAction<C, T, E> {
    /// Create a new `BranchAction`.
    pub fn new(condition: C, then_action: T, else_action: E) -> Self {
        Self {
            condition,
            then_action,
            else_action,
        }
    }
}

impl<C, T, E> Action for BranchAction<C, T, E>
where
    C: Fn(&Context) -> bool + Send + Sync + 'static,
    T: Action,
    E: Action,
{
    fn run(&self, ctx: &mut Context) -> Result<(), BoxError> {
        if (self.condition)(ctx) {
            self.then_action.run(ctx)
        } else {
            self.else_action.run(ctx)
        }
    }
}
