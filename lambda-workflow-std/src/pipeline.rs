//! # Invocation Pipeline
//!
//! Runs one resolved handler entry against one event:
//!
//! ```text
//! DECODE_INPUT -> CONTEXT_BUILT -> GLOBAL_PRE -> LOCAL_PRE -> CALL -> LOCAL_POST -> GLOBAL_POST
//! ```
//!
//! The pipeline is fail-fast. The first failing stage ends the invocation and
//! nothing after it runs; side effects of the actions that already ran are
//! kept. The post-actions run even when the handler fails, and the handler
//! error is returned once they are done.

use crate::registry::HandlerEntry;
use lambda_workflow_core::{
    Bootstrap, BoxError, BoxedAction, Context, ErrorKind, Message, WorkflowError,
};
use std::{any::Any, fmt};

/// A stage of the invocation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Decoding the handler input from the event.
    DecodeInput,
    /// Building the context and the per-invocation injector.
    ContextBuilt,
    /// Workflow-wide actions run before every handler.
    GlobalPre,
    /// Actions attached to the route, run before its handler.
    LocalPre,
    /// The handler itself.
    Call,
    /// Actions attached to the route, run after its handler.
    LocalPost,
    /// Workflow-wide actions run after every handler.
    GlobalPost,
}

impl Stage {
    /// Short name, used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Stage::DecodeInput => "decode_input",
            Stage::ContextBuilt => "context_built",
            Stage::GlobalPre => "global_pre",
            Stage::LocalPre => "local_pre",
            Stage::Call => "call",
            Stage::LocalPost => "local_post",
            Stage::GlobalPost => "global_post",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The state every workflow shares: the bootstrap and the global actions.
///
/// `Pipeline` is generic over the event only through [`Pipeline::invoke`],
/// so the same pipeline drives proxy, authorizer and custom events.
#[derive(Clone, Default)]
pub struct Pipeline {
    bootstrap: Option<Bootstrap>,
    pre_actions: Vec<BoxedAction>,
    post_actions: Vec<BoxedAction>,
}

impl Pipeline {
    /// Create a pipeline.
    pub fn new(
        bootstrap: Option<Bootstrap>,
        pre_actions: Vec<BoxedAction>,
        post_actions: Vec<BoxedAction>,
    ) -> Self {
        Self {
            bootstrap,
            pre_actions,
            post_actions,
        }
    }

    /// Returns true if a bootstrap is configured.
    pub fn has_bootstrap(&self) -> bool {
        self.bootstrap.is_some()
    }

    /// Global actions run before every handler.
    pub fn pre_actions(&self) -> &[BoxedAction] {
        &self.pre_actions
    }

    /// Global actions run after every handler.
    pub fn post_actions(&self) -> &[BoxedAction] {
        &self.post_actions
    }

    /// Run `entry` against `event`.
    ///
    /// Returns the context in its terminal state, ready for response
    /// extraction. `platform` is attached to the context untouched.
    pub fn invoke<E, P>(
        &self,
        event: E,
        platform: Option<P>,
        entry: &HandlerEntry<E>,
    ) -> Result<Context, WorkflowError>
    where
        E: Message,
        P: Any + Send + Sync,
    {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!("invocation", handler = entry.handler().type_name());
        #[cfg(feature = "tracing")]
        let _guard = span.enter();

        trace_stage(Stage::DecodeInput);
        let request = entry.handler().decode(&event).inspect_err(|err| {
            log_failure(Stage::DecodeInput, err);
        })?;

        trace_stage(Stage::ContextBuilt);
        let injector = self.bootstrap.as_ref().map(|bootstrap| bootstrap());
        let mut ctx = Context::new(event, request, injector);
        if let Some(platform) = platform {
            ctx = ctx.with_platform(platform);
        }

        run_actions(Stage::GlobalPre, &self.pre_actions, &mut ctx)?;
        run_actions(Stage::LocalPre, entry.pre_actions(), &mut ctx)?;

        trace_stage(Stage::Call);
        entry.handler().invoke(&mut ctx).inspect_err(|err| {
            log_failure(Stage::Call, err);
        })?;

        run_actions(Stage::LocalPost, entry.post_actions(), &mut ctx)?;
        run_actions(Stage::GlobalPost, &self.post_actions, &mut ctx)?;

        if let Some(err) = ctx.take_handler_error() {
            let err = surface(ErrorKind::Handler, err);
            log_failure(Stage::Call, &err);
            return Err(err);
        }

        Ok(ctx)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("has_bootstrap", &self.bootstrap.is_some())
            .field("pre_actions", &self.pre_actions.len())
            .field("post_actions", &self.post_actions.len())
            .finish()
    }
}

fn run_actions(
    stage: Stage,
    actions: &[BoxedAction],
    ctx: &mut Context,
) -> Result<(), WorkflowError> {
    if actions.is_empty() {
        return Ok(());
    }
    trace_stage(stage);

    for action in actions {
        if let Err(err) = action.run(ctx) {
            let err = surface(ErrorKind::Action, err);
            log_failure(stage, &err);
            return Err(err);
        }
    }
    Ok(())
}

/// Wrap a user error as `kind`, letting contract violations through as is.
fn surface(kind: ErrorKind, err: BoxError) -> WorkflowError {
    match err.downcast::<WorkflowError>() {
        Ok(err) if err.is_contract_violation() => *err,
        Ok(err) => WorkflowError::from_source(kind, err as BoxError),
        Err(err) => WorkflowError::from_source(kind, err),
    }
}

fn trace_stage(stage: Stage) {
    #[cfg(feature = "tracing")]
    tracing::trace!(stage = stage.as_str(), "entering stage");

    #[cfg(not(feature = "tracing"))]
    let _ = stage;
}

fn log_failure(stage: Stage, err: &WorkflowError) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        stage = stage.as_str(),
        kind = err.kind().as_str(),
        error = %err,
        "invocation failed"
    );

    #[cfg(not(feature = "tracing"))]
    let _ = (stage, err);
}
