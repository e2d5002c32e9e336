//! Payload extraction.
//!
//! The handler's second parameter decides how the event payload is decoded.
//! Each parameter type implements [`FromEvent`] for the events it can be
//! decoded from:
//!
//! | Parameter | Proxy request | Authorizer request |
//! |-----------|---------------|--------------------|
//! | `String` | body, verbatim | - |
//! | `Vec<u8>` | body bytes, verbatim | - |
//! | [`Json<T>`] | body object merged with headers, path and query parameters | the whole event |
//! | [`JsonBody<T>`] | body, as any JSON value | - |
//! | [`Event<E>`] | clone of the event | clone of the event |

use crate::event::{AuthorizerRequest, ProxyRequest};
use serde::de::{self, DeserializeOwned};
use serde_json::{Map, Value};
use std::convert::Infallible;

/// Decode `Self` from an event.
pub trait FromEvent<E>: Sized {
    /// The error type returned if decoding fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Attempt to decode `Self` from the given event.
    fn from_event(event: &E) -> Result<Self, Self::Error>;
}

/// Structured (JSON) handler input.
///
/// For proxy requests the body is parsed into a map and the headers, path
/// parameters and query string parameters are merged on top of it, in that
/// order, later sources overwriting earlier keys. The merged map is then
/// deserialized into `T`. A body that is a JSON value other than an object
/// fails to decode; use [`JsonBody`] for arrays and other non-object inputs.
///
/// `Json<Box<T>>` decodes into a freshly allocated `T`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the decoded value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned> FromEvent<ProxyRequest> for Json<T> {
    type Error = serde_json::Error;

    fn from_event(event: &ProxyRequest) -> Result<Self, Self::Error> {
        serde_json::from_value(merged_payload(event)?).map(Json)
    }
}

impl<T: DeserializeOwned> FromEvent<AuthorizerRequest> for Json<T> {
    type Error = serde_json::Error;

    fn from_event(event: &AuthorizerRequest) -> Result<Self, Self::Error> {
        serde_json::from_value(serde_json::to_value(event)?).map(Json)
    }
}

/// Build the structured payload of a proxy request.
///
/// Precedence: body < headers < path parameters < query string parameters.
/// An empty body counts as an empty object; any other non-object body is an
/// error.
pub fn merged_payload(event: &ProxyRequest) -> Result<Value, serde_json::Error> {
    let mut payload = if event.body.is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(&event.body)? {
            Value::Object(map) => map,
            _ => return Err(de::Error::custom("request body is not a JSON object")),
        }
    };

    let sources = [
        &event.headers,
        &event.path_parameters,
        &event.query_string_parameters,
    ];
    for source in sources {
        for (key, value) in source {
            payload.insert(key.clone(), Value::String(value.clone()));
        }
    }

    Ok(Value::Object(payload))
}

/// JSON handler input decoded from the body alone.
///
/// Headers and parameters are not merged in, so `T` can be any shape:
/// `JsonBody<Vec<Car>>` takes an array body as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Unwrap the decoded value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned> FromEvent<ProxyRequest> for JsonBody<T> {
    type Error = serde_json::Error;

    fn from_event(event: &ProxyRequest) -> Result<Self, Self::Error> {
        serde_json::from_str(&event.body).map(JsonBody)
    }
}

impl FromEvent<ProxyRequest> for String {
    type Error = Infallible;

    fn from_event(event: &ProxyRequest) -> Result<Self, Self::Error> {
        Ok(event.body.clone())
    }
}

impl FromEvent<ProxyRequest> for Vec<u8> {
    type Error = Infallible;

    fn from_event(event: &ProxyRequest) -> Result<Self, Self::Error> {
        Ok(event.body.as_bytes().to_vec())
    }
}

/// An extractor that clones the entire event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event<E>(pub E);

impl<E: Clone> FromEvent<E> for Event<E> {
    type Error = Infallible;

    fn from_event(event: &E) -> Result<Self, Self::Error> {
        Ok(Event(event.clone()))
    }
}
