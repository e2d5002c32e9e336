//! Configuration shared by every workflow builder.

use crate::pipeline::Pipeline;
use lambda_workflow_core::{Action, Bootstrap, BoxedAction, boxed_action};
use std::fmt;

/// Bootstrap and global actions, collected while a workflow is being built.
#[derive(Default)]
pub struct WorkflowBuilder {
    bootstrap: Option<Bootstrap>,
    pre_actions: Vec<BoxedAction>,
    post_actions: Vec<BoxedAction>,
}

impl WorkflowBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a global action run before every handler.
    pub fn add_pre_action<A: Action>(mut self, action: A) -> Self {
        self.pre_actions.push(boxed_action(action));
        self
    }

    /// Append a global action run after every handler.
    pub fn add_post_action<A: Action>(mut self, action: A) -> Self {
        self.post_actions.push(boxed_action(action));
        self
    }

    /// Set the factory building the per-invocation injector.
    ///
    /// Replaces any previously set bootstrap.
    pub fn set_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Freeze the configuration into a [`Pipeline`].
    pub fn into_pipeline(self) -> Pipeline {
        Pipeline::new(self.bootstrap, self.pre_actions, self.post_actions)
    }
}

impl fmt::Debug for WorkflowBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowBuilder")
            .field("has_bootstrap", &self.bootstrap.is_some())
            .field("pre_actions", &self.pre_actions.len())
            .field("post_actions", &self.post_actions.len())
            .finish()
    }
}
