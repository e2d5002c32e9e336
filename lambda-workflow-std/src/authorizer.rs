//! API Gateway custom authorizer workflow.
//!
//! One handler, no routing. The handler answers with an
//! [`AuthorizerResponse`], set either as the typed or as the raw response.

use crate::{
    builder::WorkflowBuilder, pipeline::Pipeline, registry::HandlerEntry,
    response::into_authorizer_response,
};
use lambda_workflow_core::{
    Action, AuthorizerRequest, AuthorizerResponse, Bootstrap, ErrorKind, Handler,
    RouterBuildError, WorkflowError, boxed_action, boxed_handler,
};
use std::{any::Any, fmt, sync::Arc};

/// A built authorizer workflow.
#[derive(Clone)]
pub struct AuthorizerWorkflow {
    pipeline: Pipeline,
    entry: Arc<HandlerEntry<AuthorizerRequest>>,
}

impl AuthorizerWorkflow {
    /// Start building an authorizer workflow.
    pub fn builder() -> AuthorizerWorkflowBuilder {
        AuthorizerWorkflowBuilder::default()
    }

    /// Handle one authorizer request.
    ///
    /// Returns `Ok(None)` when the handler set no response, and an
    /// `"invalid response"` contract error when it set something other than
    /// an [`AuthorizerResponse`].
    pub fn handle(
        &self,
        event: AuthorizerRequest,
    ) -> Result<Option<AuthorizerResponse>, WorkflowError> {
        let ctx = self.pipeline.invoke(event, None::<()>, &*self.entry)?;
        into_authorizer_response(ctx.into_outcome())
    }

    /// Handle one authorizer request with a platform context attached.
    pub fn handle_with<P>(
        &self,
        platform: P,
        event: AuthorizerRequest,
    ) -> Result<Option<AuthorizerResponse>, WorkflowError>
    where
        P: Any + Send + Sync,
    {
        let ctx = self.pipeline.invoke(event, Some(platform), &*self.entry)?;
        into_authorizer_response(ctx.into_outcome())
    }

    /// Handle a JSON encoded authorizer request.
    ///
    /// A handler setting no response encodes as `null`.
    pub fn handle_payload(&self, payload: &[u8]) -> Result<Vec<u8>, WorkflowError> {
        let event: AuthorizerRequest = serde_json::from_slice(payload)
            .map_err(|e| WorkflowError::from_source(ErrorKind::Decode, e))?;
        let response = self.handle(event)?;
        serde_json::to_vec(&response).map_err(|e| WorkflowError::from_source(ErrorKind::Encode, e))
    }
}

impl fmt::Debug for AuthorizerWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizerWorkflow")
            .field("pipeline", &self.pipeline)
            .field("entry", &self.entry)
            .finish()
    }
}

/// Builder for [`AuthorizerWorkflow`].
#[derive(Default)]
pub struct AuthorizerWorkflowBuilder {
    base: WorkflowBuilder,
    entry: Option<HandlerEntry<AuthorizerRequest>>,
}

impl AuthorizerWorkflowBuilder {
    /// Set the handler, replacing any previous one along with its actions.
    pub fn set_handler<H, Args>(mut self, handler: H) -> AuthorizerHandlerBuilder
    where
        H: Handler<AuthorizerRequest, Args>,
        Args: 'static,
    {
        self.entry = Some(HandlerEntry::new(boxed_handler(handler)));
        AuthorizerHandlerBuilder { builder: self }
    }

    /// Append a global action run before the handler.
    pub fn add_pre_action<A: Action>(mut self, action: A) -> Self {
        self.base = self.base.add_pre_action(action);
        self
    }

    /// Append a global action run after the handler.
    pub fn add_post_action<A: Action>(mut self, action: A) -> Self {
        self.base = self.base.add_post_action(action);
        self
    }

    /// Set the factory building the per-invocation injector.
    pub fn set_bootstrap(mut self, bootstrap: Bootstrap) -> Self {
        self.base = self.base.set_bootstrap(bootstrap);
        self
    }

    /// Freeze the workflow. Fails when no handler was set.
    pub fn build(self) -> Result<AuthorizerWorkflow, RouterBuildError> {
        let entry = self.entry.ok_or_else(|| {
            RouterBuildError::BuildFailed("authorizer workflow has no handler".to_string())
        })?;

        Ok(AuthorizerWorkflow {
            pipeline: self.base.into_pipeline(),
            entry: Arc::new(entry),
        })
    }
}

/// Builder scoped to the authorizer handler.
pub struct AuthorizerHandlerBuilder {
    builder: AuthorizerWorkflowBuilder,
}

impl AuthorizerHandlerBuilder {
    /// Append an action run right before the handler.
    pub fn with_pre_action<A: Action>(mut self, action: A) -> Self {
        if let Some(entry) = self.builder.entry.as_mut() {
            entry.push_pre_action(boxed_action(action));
        }
        self
    }

    /// Append an action run right after the handler.
    pub fn with_post_action<A: Action>(mut self, action: A) -> Self {
        if let Some(entry) = self.builder.entry.as_mut() {
            entry.push_post_action(boxed_action(action));
        }
        self
    }

    /// Return to the workflow builder.
    pub fn done(self) -> AuthorizerWorkflowBuilder {
        self.builder
    }

    /// See [`AuthorizerWorkflowBuilder::add_pre_action`].
    pub fn add_pre_action<A: Action>(self, action: A) -> AuthorizerWorkflowBuilder {
        self.builder.add_pre_action(action)
    }

    /// See [`AuthorizerWorkflowBuilder::add_post_action`].
    pub fn add_post_action<A: Action>(self, action: A) -> AuthorizerWorkflowBuilder {
        self.builder.add_post_action(action)
    }

    /// See [`AuthorizerWorkflowBuilder::set_bootstrap`].
    pub fn set_bootstrap(self, bootstrap: Bootstrap) -> AuthorizerWorkflowBuilder {
        self.builder.set_bootstrap(bootstrap)
    }

    /// See [`AuthorizerWorkflowBuilder::build`].
    pub fn build(self) -> Result<AuthorizerWorkflow, RouterBuildError> {
        self.builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_workflow_core::{Context, Event};

    fn request(token: &str) -> AuthorizerRequest {
        AuthorizerRequest {
            kind: "TOKEN".into(),
            authorization_token: token.into(),
            method_arn: "arn:aws:execute-api:eu-west-1:123:api/prod/GET/car".into(),
        }
    }

    #[test]
    fn test_missing_handler_fails_build() {
        assert!(matches!(
            AuthorizerWorkflow::builder().build(),
            Err(RouterBuildError::BuildFailed(_))
        ));
    }

    #[test]
    fn test_typed_response() {
        let workflow = AuthorizerWorkflow::builder()
            .set_handler(|ctx: &mut Context, Event(req): Event<AuthorizerRequest>| {
                ctx.set_response(AuthorizerResponse::for_principal(req.authorization_token));
            })
            .build()
            .unwrap();

        let response = workflow.handle(request("user-1")).unwrap().unwrap();
        assert_eq!(response.principal_id, "user-1");
    }

    #[test]
    fn test_raw_wins_over_typed() {
        let workflow = AuthorizerWorkflow::builder()
            .set_handler(|ctx: &mut Context| {
                ctx.set_raw_response(AuthorizerResponse::for_principal("raw"));
                ctx.set_response(AuthorizerResponse::for_principal("typed"));
            })
            .build()
            .unwrap();

        let response = workflow.handle(request("t")).unwrap().unwrap();
        assert_eq!(response.principal_id, "raw");
    }

    #[test]
    fn test_no_response_is_none() {
        let workflow = AuthorizerWorkflow::builder()
            .set_handler(|_: &mut Context| {})
            .build()
            .unwrap();

        assert_eq!(workflow.handle(request("t")).unwrap(), None);
        assert_eq!(workflow.handle_payload(br#"{"type":"TOKEN"}"#).unwrap(), b"null");
    }

    #[test]
    fn test_invalid_response() {
        let workflow = AuthorizerWorkflow::builder()
            .set_handler(|ctx: &mut Context| {
                ctx.set_response("allow");
            })
            .build()
            .unwrap();

        let err = workflow.handle(request("t")).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(err.to_string(), "invalid response");
    }
}
