#![allow(dead_code)]

use lambda_workflow::{Context, ProxyRequest, testing::CallLog};
use serde::{Deserialize, Serialize};

// ============================================================================
// Test Payload Types
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JsonReq {
    pub message: String,
    pub code: u16,
}

impl JsonReq {
    pub fn hello() -> Self {
        Self {
            message: "Hello World!".to_string(),
            code: 123,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    pub id: String,
    #[serde(default)]
    pub model: String,
}

// ============================================================================
// Request Helpers
// ============================================================================

/// A proxy request whose body is the JSON encoding of `body`.
pub fn json_request<T: Serialize>(method: &str, path: &str, body: &T) -> ProxyRequest {
    ProxyRequest::new(method, path).with_body(json(body))
}

/// JSON encoding of `value`, as the workflow writes response bodies.
pub fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap()
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler recording `label` into `log` and answering with `status`.
pub fn labelled(
    log: &CallLog,
    label: &'static str,
    status: u16,
) -> impl Fn(&mut Context) + Send + Sync + 'static {
    let log = log.clone();
    move |ctx: &mut Context| {
        log.record(label);
        ctx.set_status_code(status);
    }
}
