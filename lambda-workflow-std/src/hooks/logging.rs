//! Logging action for invocation observation.

use lambda_workflow_core::{Action, BoxError, Context, Outcome};

/// An action that logs the state of the invocation context.
///
/// Registered as a pre-action it logs the incoming event type; as a
/// post-action it also shows the status code, the response kind and the
/// handler error. Never fails.
///
/// # Example
///
/// ```rust,ignore
/// let workflow = ProxyWorkflow::builder()
///     .add_post_action(LoggingAction::named("cars_api"))
///     .add_get_handler("/car/{id}", get_car)
///     .build()?;
/// ```
pub struct LoggingAction {
    name: &'static str,
}

impl LoggingAction {
    /// Create a new `LoggingAction` with a default name.
    pub fn new() -> Self {
        Self { name: "workflow" }
    }

    /// Create a new `LoggingAction` with a custom name.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The name used in log records.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingAction {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome_kind(outcome: &Outcome) -> &'static str {
    match outcome {
        Outcome::Empty => "empty",
        Outcome::Raw(_) => "raw",
        Outcome::Typed(_) => "typed",
    }
}

impl Action for LoggingAction {
    fn run(&self, ctx: &mut Context) -> Result<(), BoxError> {
        let response = outcome_kind(ctx.outcome());

        #[cfg(feature = "tracing")]
        {
            let error = ctx.handler_error().map(ToString::to_string);
            tracing::info!(
                name = %self.name,
                status_code = ctx.status_code(),
                response,
                handler_error = ?error,
                "invocation context"
            );
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.name, response);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_action_never_fails() {
        let action = LoggingAction::new();
        let mut ctx = Context::new((), None, None);
        ctx.set_response("ok").set_status_code(200);

        action.run(&mut ctx).unwrap();
        assert_eq!(ctx.status_code(), 200);
    }

    #[test]
    fn test_logging_action_named() {
        let action = LoggingAction::named("cars_api");
        assert_eq!(action.name(), "cars_api");
        assert_eq!(LoggingAction::default().name(), "workflow");
    }

    #[test]
    fn test_outcome_kind() {
        let mut ctx = Context::new((), None, None);
        assert_eq!(outcome_kind(ctx.outcome()), "empty");
        ctx.set_response(1);
        assert_eq!(outcome_kind(ctx.outcome()), "typed");
        ctx.set_raw_response(2);
        assert_eq!(outcome_kind(ctx.outcome()), "raw");
    }
}
