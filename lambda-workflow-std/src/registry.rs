//! Registered handler entries.

use lambda_workflow_core::{BoxedAction, BoxedHandler};
use std::fmt;

/// A handler together with the actions attached to its route.
///
/// Entries are assembled while the workflow is being built and never change
/// once the workflow is built.
pub struct HandlerEntry<E> {
    handler: BoxedHandler<E>,
    pre_actions: Vec<BoxedAction>,
    post_actions: Vec<BoxedAction>,
}

impl<E> HandlerEntry<E> {
    /// Create an entry with no actions.
    pub fn new(handler: BoxedHandler<E>) -> Self {
        Self {
            handler,
            pre_actions: Vec::new(),
            post_actions: Vec::new(),
        }
    }

    /// Append an action run before the handler.
    pub fn push_pre_action(&mut self, action: BoxedAction) {
        self.pre_actions.push(action);
    }

    /// Append an action run after the handler.
    pub fn push_post_action(&mut self, action: BoxedAction) {
        self.post_actions.push(action);
    }

    /// The handler.
    pub fn handler(&self) -> &BoxedHandler<E> {
        &self.handler
    }

    /// Actions run before the handler, in order.
    pub fn pre_actions(&self) -> &[BoxedAction] {
        &self.pre_actions
    }

    /// Actions run after the handler, in order.
    pub fn post_actions(&self) -> &[BoxedAction] {
        &self.post_actions
    }
}

impl<E> fmt::Debug for HandlerEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("handler", &self.handler.type_name())
            .field("pre_actions", &self.pre_actions.len())
            .field("post_actions", &self.post_actions.len())
            .finish()
    }
}
