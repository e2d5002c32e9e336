//! Response adapters.
//!
//! Turn the terminal [`Outcome`] of an invocation into the wire response.
//! A raw response always wins: it is returned as is, without encoding.

use lambda_workflow_core::{
    AuthorizerResponse, Outcome, ProxyResponse, TypedResponse, WorkflowError,
};
use std::any::Any;

/// Status code of the routing-miss response.
pub const NOT_FOUND: u16 = 404;

/// The response produced when no route matches: `404` with an empty body.
pub fn not_found() -> ProxyResponse {
    ProxyResponse::with_status(NOT_FOUND)
}

/// Build the proxy response from the status code and outcome of an invocation.
///
/// - `Raw`: must hold a [`ProxyResponse`] or a `Box<ProxyResponse>`, returned verbatim
/// - `Typed`: JSON encoded into the body
/// - `Empty`: empty body
///
/// The status code is ignored for raw responses.
pub fn into_proxy_response(
    status_code: u16,
    outcome: Outcome,
) -> Result<ProxyResponse, WorkflowError> {
    match outcome {
        Outcome::Raw(raw) => downcast_raw::<ProxyResponse>(raw)
            .ok_or_else(|| WorkflowError::contract("invalid raw response")),
        Outcome::Typed(typed) => Ok(ProxyResponse {
            status_code,
            body: typed.encode()?,
            ..ProxyResponse::default()
        }),
        Outcome::Empty => Ok(ProxyResponse::with_status(status_code)),
    }
}

/// Build the authorizer response from the outcome of an invocation.
///
/// Both a raw and a typed response must be an [`AuthorizerResponse`] (or a
/// boxed one). Returns `Ok(None)` when the handler set neither.
pub fn into_authorizer_response(
    outcome: Outcome,
) -> Result<Option<AuthorizerResponse>, WorkflowError> {
    let response = match outcome {
        Outcome::Empty => return Ok(None),
        Outcome::Raw(raw) => downcast_raw::<AuthorizerResponse>(raw),
        Outcome::Typed(typed) => downcast_typed::<AuthorizerResponse>(typed),
    };
    response
        .map(Some)
        .ok_or_else(|| WorkflowError::contract("invalid response"))
}

fn downcast_raw<T: Any>(raw: Box<dyn Any + Send + Sync>) -> Option<T> {
    match raw.downcast::<T>() {
        Ok(value) => Some(*value),
        Err(raw) => raw.downcast::<Box<T>>().ok().map(|value| **value),
    }
}

fn downcast_typed<T: Any>(typed: TypedResponse) -> Option<T> {
    match typed.downcast::<T>() {
        Ok(value) => Some(value),
        Err(typed) => typed.downcast::<Box<T>>().ok().map(|value| *value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_workflow_core::Context;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Reply {
        message: &'static str,
        code: i32,
    }

    fn finish(f: impl FnOnce(&mut Context)) -> (u16, Outcome) {
        let mut ctx = Context::new((), None, None);
        f(&mut ctx);
        (ctx.status_code(), ctx.into_outcome())
    }

    #[test]
    fn test_not_found() {
        let response = not_found();
        assert_eq!(response.status_code, 404);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_typed_response_is_encoded() {
        let (status, outcome) = finish(|ctx| {
            ctx.set_response(Reply {
                message: "Hello",
                code: 123,
            })
            .set_status_code(123);
        });

        let response = into_proxy_response(status, outcome).unwrap();
        assert_eq!(response.status_code, 123);
        assert_eq!(response.body, r#"{"message":"Hello","code":123}"#);
    }

    #[test]
    fn test_empty_outcome_keeps_status() {
        let (status, outcome) = finish(|_| {});
        let response = into_proxy_response(status, outcome).unwrap();

        assert_eq!(response.status_code, 0);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_raw_response_value_and_box() {
        let raw = ProxyResponse {
            body: "raw".into(),
            ..ProxyResponse::with_status(202)
        };

        let (status, outcome) = finish(|ctx| {
            ctx.set_raw_response(raw.clone()).set_status_code(500);
        });
        assert_eq!(into_proxy_response(status, outcome).unwrap(), raw);

        let (status, outcome) = finish(|ctx| {
            ctx.set_raw_response(Box::new(raw.clone()));
        });
        assert_eq!(into_proxy_response(status, outcome).unwrap(), raw);
    }

    #[test]
    fn test_raw_response_of_wrong_type() {
        let (status, outcome) = finish(|ctx| {
            ctx.set_raw_response("not a response");
        });

        let err = into_proxy_response(status, outcome).unwrap_err();
        assert!(err.is_contract_violation());
        assert_eq!(err.to_string(), "invalid raw response");
    }

    #[test]
    fn test_authorizer_outcomes() {
        let allow = AuthorizerResponse::for_principal("user");

        let (_, empty) = finish(|_| {});
        assert_eq!(into_authorizer_response(empty).unwrap(), None);

        let (_, typed) = finish(|ctx| {
            ctx.set_response(allow.clone());
        });
        assert_eq!(into_authorizer_response(typed).unwrap(), Some(allow.clone()));

        let (_, boxed) = finish(|ctx| {
            ctx.set_raw_response(Box::new(allow.clone()));
        });
        assert_eq!(into_authorizer_response(boxed).unwrap(), Some(allow));

        let (_, invalid) = finish(|ctx| {
            ctx.set_response("nope");
        });
        assert_eq!(
            into_authorizer_response(invalid).unwrap_err().to_string(),
            "invalid response"
        );
    }
}
