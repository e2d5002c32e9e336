//! # Invocation Context
//!
//! The per-invocation state handlers and actions interact with. A context is
//! built fresh for every invocation, right before the first action runs, and
//! is consumed when the response is extracted.
//!
//! The context owns:
//!
//! - the original event, read back through [`Context::event`]
//! - an optional platform context passed through untouched ([`Context::platform`])
//! - the decoded handler input, readable by pre-actions ([`Context::request`])
//! - the response [`Outcome`] and status code set by the handler
//! - the handler error, visible to post-actions ([`Context::handler_error`])
//! - the per-invocation [`Injector`], when the workflow has a bootstrap

use crate::{
    error::{BoxError, ErrorKind, ResolveError, WorkflowError},
    injector::Injector,
    message::Message,
};
use serde::Serialize;
use std::{
    any::{Any, type_name},
    fmt,
    sync::Arc,
};

type AnyValue = Box<dyn Any + Send + Sync>;

/// A typed response together with the encoder for its concrete type.
pub struct TypedResponse {
    value: AnyValue,
    type_name: &'static str,
    encode: fn(&(dyn Any + Send + Sync)) -> Result<String, WorkflowError>,
}

impl TypedResponse {
    fn new<T: Serialize + Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
            encode: encode_as::<T>,
        }
    }

    /// Serialize the response as JSON.
    pub fn encode(&self) -> Result<String, WorkflowError> {
        (self.encode)(self.value.as_ref())
    }

    /// Name of the stored type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the stored value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the stored value if it is a `T`, giving the response back otherwise.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self {
            value,
            type_name,
            encode,
        } = self;
        match value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self {
                value,
                type_name,
                encode,
            }),
        }
    }
}

impl fmt::Debug for TypedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedResponse")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn encode_as<T: Serialize + 'static>(value: &(dyn Any + Send + Sync)) -> Result<String, WorkflowError> {
    let value = value
        .downcast_ref::<T>()
        .ok_or_else(|| WorkflowError::contract("typed response changed type"))?;
    serde_json::to_string(value).map_err(|e| WorkflowError::from_source(ErrorKind::Encode, e))
}

/// The response representation a handler chose.
///
/// At most one representation is authoritative. A raw response is never
/// replaced by a typed one.
#[derive(Debug, Default)]
pub enum Outcome {
    /// Nothing was set; the response body is empty.
    #[default]
    Empty,
    /// A fully formed outbound response object, returned as is.
    Raw(AnyValue),
    /// A value to be encoded into the response body.
    Typed(TypedResponse),
}

impl Outcome {
    /// Returns true when nothing was set.
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }
}

/// Per-invocation state shared by the actions and the handler.
pub struct Context {
    event: AnyValue,
    event_type: &'static str,
    platform: Option<AnyValue>,
    request: Option<AnyValue>,
    outcome: Outcome,
    status_code: u16,
    handler_error: Option<BoxError>,
    injector: Option<Box<dyn Injector>>,
}

impl Context {
    /// Build the context for one invocation.
    ///
    /// `request` is the decoded handler input, absent when the handler
    /// declares none. `injector` is the product of the workflow bootstrap.
    pub fn new<E: Message>(
        event: E,
        request: Option<AnyValue>,
        injector: Option<Box<dyn Injector>>,
    ) -> Self {
        Self {
            event: Box::new(event),
            event_type: type_name::<E>(),
            platform: None,
            request,
            outcome: Outcome::Empty,
            status_code: 0,
            handler_error: None,
            injector,
        }
    }

    /// Attach the opaque platform context (deadline, request id, ...).
    pub fn with_platform<P: Any + Send + Sync>(mut self, platform: P) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    /// Borrow the original event as `T`.
    ///
    /// Fails unless `T` is exactly the type of the event.
    pub fn event<T: Any>(&self) -> Result<&T, WorkflowError> {
        self.event.downcast_ref::<T>().ok_or_else(|| {
            WorkflowError::contract(format!(
                "cannot read event of type {} as {}",
                self.event_type,
                type_name::<T>()
            ))
        })
    }

    /// Borrow the platform context as `P`.
    pub fn platform<P: Any>(&self) -> Result<&P, WorkflowError> {
        let platform = self
            .platform
            .as_ref()
            .ok_or_else(|| WorkflowError::contract("no platform context was provided"))?;
        platform.downcast_ref::<P>().ok_or_else(|| {
            WorkflowError::contract(format!(
                "platform context is not of type {}",
                type_name::<P>()
            ))
        })
    }

    /// Borrow the decoded handler input as `T`.
    ///
    /// Returns `Ok(None)` when the handler declares no input. The value stays
    /// readable for the whole invocation, post-actions included.
    pub fn request<T: Any>(&self) -> Result<Option<&T>, WorkflowError> {
        match &self.request {
            None => Ok(None),
            Some(request) => request.downcast_ref::<T>().map(Some).ok_or_else(|| {
                WorkflowError::contract(format!(
                    "decoded request is not of type {}",
                    type_name::<T>()
                ))
            }),
        }
    }

    /// Set the typed response, encoded as JSON into the response body.
    ///
    /// Ignored when a raw response is already set.
    pub fn set_response<T>(&mut self, response: T) -> &mut Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        if matches!(self.outcome, Outcome::Raw(_)) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                response_type = type_name::<T>(),
                "raw response already set, typed response ignored"
            );
        } else {
            self.outcome = Outcome::Typed(TypedResponse::new(response));
        }
        self
    }

    /// Set a fully formed outbound response, returned verbatim.
    ///
    /// Takes precedence over any typed response.
    pub fn set_raw_response<T: Any + Send + Sync>(&mut self, response: T) -> &mut Self {
        self.outcome = Outcome::Raw(Box::new(response));
        self
    }

    /// Drop whatever response was set.
    pub fn clear_response(&mut self) -> &mut Self {
        self.outcome = Outcome::Empty;
        self
    }

    /// Set the response status code.
    pub fn set_status_code(&mut self, status_code: u16) -> &mut Self {
        self.status_code = status_code;
        self
    }

    /// The response status code, `0` until set.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Borrow the typed response as `T`, `Ok(None)` when none is set.
    pub fn response<T: Any>(&self) -> Result<Option<&T>, WorkflowError> {
        match &self.outcome {
            Outcome::Typed(typed) => typed.downcast_ref::<T>().map(Some).ok_or_else(|| {
                WorkflowError::contract(format!(
                    "cannot read response of type {} as {}",
                    typed.type_name(),
                    type_name::<T>()
                ))
            }),
            _ => Ok(None),
        }
    }

    /// Borrow the raw response as `T`, `Ok(None)` when none is set.
    pub fn raw_response<T: Any>(&self) -> Result<Option<&T>, WorkflowError> {
        match &self.outcome {
            Outcome::Raw(raw) => raw.downcast_ref::<T>().map(Some).ok_or_else(|| {
                WorkflowError::contract(format!(
                    "raw response is not of type {}",
                    type_name::<T>()
                ))
            }),
            _ => Ok(None),
        }
    }

    /// The current response representation.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Consume the context, returning the response representation.
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }

    /// The error returned by the handler.
    ///
    /// Always `None` in pre-actions; set before post-actions run.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.handler_error.as_deref()
    }

    /// Take the handler error out of the context.
    ///
    /// Used by the pipeline once the post-actions have run.
    pub fn take_handler_error(&mut self) -> Option<BoxError> {
        self.handler_error.take()
    }

    /// The per-invocation injector.
    pub fn injector(&self) -> Result<&dyn Injector, WorkflowError> {
        self.injector
            .as_deref()
            .ok_or_else(|| ResolveError::NoInjector.into())
    }

    /// Resolve a dependency by type from the per-invocation injector.
    pub fn resolve<T: Any + Send + Sync>(&self) -> Result<Arc<T>, WorkflowError> {
        Ok(self.injector()?.resolve::<T>()?)
    }

    /// Resolve a dependency by name from the per-invocation injector.
    pub fn resolve_by_name<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, WorkflowError> {
        Ok(self.injector()?.resolve_by_name::<T>(name)?)
    }

    pub(crate) fn set_handler_error(&mut self, err: BoxError) {
        self.handler_error = Some(err);
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("event_type", &self.event_type)
            .field("has_request", &self.request.is_some())
            .field("outcome", &self.outcome)
            .field("status_code", &self.status_code)
            .field("handler_error", &self.handler_error)
            .field("has_injector", &self.injector.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ProxyRequest, ProxyResponse};

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Reply {
        message: String,
    }

    fn reply(message: &str) -> Reply {
        Reply {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_event_accessor_checks_type() {
        let ctx = Context::new(ProxyRequest::new("GET", "/"), None, None);

        assert_eq!(ctx.event::<ProxyRequest>().unwrap().path, "/");

        let err = ctx.event::<ProxyResponse>().unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.to_string().starts_with("cannot read event of type"));
    }

    #[test]
    fn test_request_is_absent_without_input() {
        let ctx = Context::new((), None, None);
        assert!(ctx.request::<Reply>().unwrap().is_none());
    }

    #[test]
    fn test_request_accessor() {
        let ctx = Context::new((), Some(Box::new(reply("hi"))), None);

        assert_eq!(ctx.request::<Reply>().unwrap(), Some(&reply("hi")));
        assert!(ctx.request::<String>().is_err());

        let empty = Context::new((), None, None);
        assert!(empty.request::<Reply>().unwrap().is_none());
    }

    #[test]
    fn test_setters_chain() {
        let mut ctx = Context::new((), None, None);
        ctx.set_response(reply("ok")).set_status_code(201);

        assert_eq!(ctx.status_code(), 201);
        assert_eq!(ctx.response::<Reply>().unwrap(), Some(&reply("ok")));
        assert!(ctx.response::<String>().is_err());
    }

    #[test]
    fn test_raw_response_wins_over_typed() {
        let mut ctx = Context::new((), None, None);
        ctx.set_raw_response(ProxyResponse::with_status(418));
        ctx.set_response(reply("ignored"));

        assert!(ctx.response::<Reply>().unwrap().is_none());
        assert_eq!(
            ctx.raw_response::<ProxyResponse>().unwrap().unwrap().status_code,
            418
        );
        assert!(matches!(ctx.into_outcome(), Outcome::Raw(_)));
    }

    #[test]
    fn test_raw_response_replaces_typed() {
        let mut ctx = Context::new((), None, None);
        ctx.set_response(reply("first"));
        ctx.set_raw_response(ProxyResponse::with_status(200));

        assert!(matches!(ctx.outcome(), Outcome::Raw(_)));
    }

    #[test]
    fn test_clear_response() {
        let mut ctx = Context::new((), None, None);
        ctx.set_response(reply("x")).clear_response();
        assert!(ctx.outcome().is_empty());
    }

    #[test]
    fn test_typed_response_encode_and_downcast() {
        let typed = TypedResponse::new(reply("hello"));

        assert_eq!(typed.encode().unwrap(), r#"{"message":"hello"}"#);
        let typed = typed.downcast::<String>().unwrap_err();
        assert_eq!(typed.downcast::<Reply>().unwrap(), reply("hello"));
    }

    #[test]
    fn test_handler_error_roundtrip() {
        let mut ctx = Context::new((), None, None);
        assert!(ctx.handler_error().is_none());

        ctx.set_handler_error("boom".into());
        assert_eq!(ctx.handler_error().unwrap().to_string(), "boom");
        assert_eq!(ctx.take_handler_error().unwrap().to_string(), "boom");
        assert!(ctx.handler_error().is_none());
    }

    #[test]
    fn test_injector_missing_fails_at_use() {
        let ctx = Context::new((), None, None);

        let err = ctx.resolve::<String>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resolve);
    }

    #[test]
    fn test_platform_passthrough() {
        #[derive(Debug, PartialEq)]
        struct Deadline(u64);

        let ctx = Context::new((), None, None).with_platform(Deadline(30));
        assert_eq!(ctx.platform::<Deadline>().unwrap(), &Deadline(30));
        assert!(ctx.platform::<String>().is_err());

        let bare = Context::new((), None, None);
        assert!(bare.platform::<Deadline>().is_err());
    }
}
