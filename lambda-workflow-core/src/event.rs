//! API Gateway wire types.
//!
//! Only the fields the workflow reads or writes are modelled; unknown fields
//! in inbound events are ignored. Maps that API Gateway sends as `null` when
//! empty deserialize to empty maps.

use crate::message::Message;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// API Gateway REST (v1) Lambda proxy request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    /// The resource template the request matched in API Gateway.
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: String,
    /// The request path.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path: String,
    /// The HTTP method, in any case.
    #[serde(default, deserialize_with = "null_as_default")]
    pub http_method: String,
    /// Single-value request headers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    /// Single-value query string parameters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,
    /// Path parameters extracted by API Gateway.
    #[serde(default, deserialize_with = "null_as_default")]
    pub path_parameters: HashMap<String, String>,
    /// Stage variables of the deployment.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stage_variables: HashMap<String, String>,
    /// The raw request body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    /// Create a request for `method` and `path` with an empty body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a path parameter.
    pub fn with_path_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_parameters.insert(name.into(), value.into());
        self
    }

    /// Add a query string parameter.
    pub fn with_query_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query_string_parameters
            .insert(name.into(), value.into());
        self
    }
}

impl Message for ProxyRequest {}

/// API Gateway REST (v1) Lambda proxy response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status_code: u16,
    /// Response headers.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Response body, empty when there is none.
    #[serde(default)]
    pub body: String,
    /// Whether `body` is base64 encoded.
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// A response with only a status code.
    pub fn with_status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }
}

/// API Gateway custom (token) authorizer request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    /// The authorizer type, `TOKEN` for token authorizers.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    /// The caller supplied token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authorization_token: String,
    /// ARN of the method being authorized.
    #[serde(default, deserialize_with = "null_as_default")]
    pub method_arn: String,
}

impl Message for AuthorizerRequest {}

/// API Gateway custom authorizer response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerResponse {
    /// The principal the caller was identified as.
    pub principal_id: String,
    /// The IAM policy granted to the caller.
    pub policy_document: PolicyDocument,
    /// Values handed to the backend integration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
    /// Usage plan API key, when the authorizer is the key source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_identifier_key: Option<String>,
}

impl AuthorizerResponse {
    /// A response for `principal_id` with an empty policy.
    pub fn for_principal(principal_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            ..Self::default()
        }
    }
}

/// IAM policy document returned by an authorizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version.
    pub version: String,
    /// Policy statements.
    #[serde(default)]
    pub statement: Vec<PolicyStatement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self {
            version: "2012-10-17".to_string(),
            statement: Vec::new(),
        }
    }
}

/// One statement of a [`PolicyDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Actions, e.g. `execute-api:Invoke`.
    pub action: Vec<String>,
    /// `Allow` or `Deny`.
    pub effect: String,
    /// Resource ARNs.
    pub resource: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
