//! # Handlers
//!
//! A handler is the user function a route resolves to. It always receives the
//! invocation [`Context`] and may declare exactly one more parameter, decoded
//! from the event through [`FromEvent`]:
//!
//! ```rust,ignore
//! fn health(ctx: &mut Context) {
//!     ctx.set_status_code(200);
//! }
//!
//! fn create(ctx: &mut Context, Json(car): Json<Car>) -> Result<(), BoxError> {
//!     ctx.set_response(car).set_status_code(201);
//!     Ok(())
//! }
//! ```
//!
//! The `Args` parameter of [`Handler`] only exists to tell the two shapes
//! apart; it is `()` for context-only handlers and `(T,)` otherwise.
//! Registration erases the handler into a [`BoxedHandler`] which still knows
//! its input type, so decoding stays type-directed without any runtime
//! signature inspection.

use crate::{
    action::IntoOutcome,
    context::Context,
    error::{BoxError, ErrorKind, WorkflowError},
    extract::FromEvent,
};
use std::{any::Any, marker::PhantomData, sync::Arc};

/// A handler for events of type `E`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a handler for `{E}` events",
    label = "handlers are `Fn(&mut Context) -> Out` or `Fn(&mut Context, T) -> Out`",
    note = "`T` must implement `FromEvent<{E}>` and `Clone`, and `Out` must implement `IntoOutcome`."
)]
pub trait Handler<E, Args>: Send + Sync + 'static {
    /// The decoded input, `()` when the handler declares none.
    ///
    /// The context keeps the decoded value for the whole invocation and the
    /// handler is called with a clone of it.
    type Input: Clone + Send + Sync + 'static;

    /// Decode the handler input from the event.
    ///
    /// Returns `Ok(None)` without touching the event when the handler
    /// declares no input.
    fn decode(event: &E) -> Result<Option<Self::Input>, WorkflowError>;

    /// Call the handler.
    fn call(&self, ctx: &mut Context, input: Option<Self::Input>) -> Result<(), BoxError>;
}

impl<E, F, Out> Handler<E, ()> for F
where
    F: Fn(&mut Context) -> Out + Send + Sync + 'static,
    Out: IntoOutcome,
{
    type Input = ();

    fn decode(_event: &E) -> Result<Option<()>, WorkflowError> {
        Ok(None)
    }

    fn call(&self, ctx: &mut Context, _input: Option<()>) -> Result<(), BoxError> {
        (self)(ctx).into_outcome()
    }
}

impl<E, F, T, Out> Handler<E, (T,)> for F
where
    F: Fn(&mut Context, T) -> Out + Send + Sync + 'static,
    T: FromEvent<E> + Clone + Send + Sync + 'static,
    Out: IntoOutcome,
{
    type Input = T;

    fn decode(event: &E) -> Result<Option<T>, WorkflowError> {
        T::from_event(event)
            .map(Some)
            .map_err(|e| WorkflowError::from_source(ErrorKind::Decode, e))
    }

    fn call(&self, ctx: &mut Context, input: Option<T>) -> Result<(), BoxError> {
        let input = input.ok_or_else(|| WorkflowError::contract("handler input was not decoded"))?;
        (self)(ctx, input).into_outcome()
    }
}

/// Object-safe form of a registered handler.
pub trait ErasedHandler<E>: Send + Sync {
    /// Decode the handler input from the event, type-erased.
    fn decode(&self, event: &E) -> Result<Option<Box<dyn Any + Send + Sync>>, WorkflowError>;

    /// Call the handler with the input stored in `ctx`.
    ///
    /// The handler's error, if any, is recorded in the context so post-actions
    /// can observe it. An `Err` is only returned for contract violations.
    fn invoke(&self, ctx: &mut Context) -> Result<(), WorkflowError>;

    /// Name of the handler type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

/// A registered handler.
pub type BoxedHandler<E> = Arc<dyn ErasedHandler<E>>;

/// Erase `handler` into a [`BoxedHandler`].
pub fn boxed_handler<E, H, Args>(handler: H) -> BoxedHandler<E>
where
    E: 'static,
    H: Handler<E, Args>,
    Args: 'static,
{
    Arc::new(HandlerAdapter {
        handler,
        _marker: PhantomData,
    })
}

struct HandlerAdapter<H, Args> {
    handler: H,
    _marker: PhantomData<fn() -> Args>,
}

impl<E, H, Args> ErasedHandler<E> for HandlerAdapter<H, Args>
where
    H: Handler<E, Args>,
    Args: 'static,
{
    fn decode(&self, event: &E) -> Result<Option<Box<dyn Any + Send + Sync>>, WorkflowError> {
        Ok(H::decode(event)?.map(|input| Box::new(input) as Box<dyn Any + Send + Sync>))
    }

    fn invoke(&self, ctx: &mut Context) -> Result<(), WorkflowError> {
        let input = ctx.request::<H::Input>()?.cloned();
        if let Err(err) = self.handler.call(ctx, input) {
            ctx.set_handler_error(err);
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<H>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::ProxyRequest,
        extract::Json,
    };
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Car {
        model: String,
    }

    fn invoke(handler: &BoxedHandler<ProxyRequest>, event: ProxyRequest) -> Context {
        let request = handler.decode(&event).unwrap();
        let mut ctx = Context::new(event, request, None);
        handler.invoke(&mut ctx).unwrap();
        ctx
    }

    #[test]
    fn test_context_only_handler_skips_decode() {
        let handler = boxed_handler(|ctx: &mut Context| {
            ctx.set_status_code(200);
        });
        let event = ProxyRequest::new("GET", "/").with_body("{malformed");

        assert!(handler.decode(&event).unwrap().is_none());
        assert_eq!(invoke(&handler, event).status_code(), 200);
    }

    #[test]
    fn test_json_handler_receives_input() {
        let handler = boxed_handler(|ctx: &mut Context, Json(car): Json<Car>| {
            ctx.set_response(car).set_status_code(201);
        });
        let event = ProxyRequest::new("POST", "/car").with_body(r#"{"model":"T"}"#);

        let ctx = invoke(&handler, event);
        assert_eq!(ctx.status_code(), 201);
        assert_eq!(
            ctx.response::<Car>().unwrap(),
            Some(&Car { model: "T".into() })
        );
    }

    #[test]
    fn test_decoded_input_outlives_the_call() {
        let handler = boxed_handler(|ctx: &mut Context, Json(mut car): Json<Car>| {
            car.model.push_str(" (edited)");
            ctx.set_response(car);
        });
        let event = ProxyRequest::new("POST", "/car").with_body(r#"{"model":"T"}"#);

        let ctx = invoke(&handler, event);
        let Json(kept) = ctx.request::<Json<Car>>().unwrap().unwrap();
        assert_eq!(kept.model, "T");
        assert_eq!(ctx.response::<Car>().unwrap().unwrap().model, "T (edited)");
    }

    #[test]
    fn test_decode_failure_is_decode_error() {
        let handler = boxed_handler(|_: &mut Context, _car: Json<Car>| {});
        let event = ProxyRequest::new("POST", "/car").with_body("{malformed");

        let err = handler.decode(&event).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.original_error().is_some());
    }

    #[test]
    fn test_handler_error_is_recorded() {
        let handler = boxed_handler(|_: &mut Context| -> Result<(), BoxError> {
            Err("handler error".into())
        });

        let ctx = invoke(&handler, ProxyRequest::new("GET", "/"));
        assert_eq!(ctx.handler_error().unwrap().to_string(), "handler error");
    }

    #[test]
    fn test_named_function_handler() {
        fn echo(ctx: &mut Context, body: String) {
            ctx.set_response(body);
        }

        let handler = boxed_handler(echo);
        let ctx = invoke(&handler, ProxyRequest::new("GET", "/").with_body("hi"));
        assert_eq!(ctx.response::<String>().unwrap().map(String::as_str), Some("hi"));
    }
}
