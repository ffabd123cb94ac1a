//! Transport-independent HTTP response.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A JSON response. A value that fails to serialize renders as `null`.
    #[must_use]
    pub fn json(status: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            tracing::error!(error = %e, "response body failed to serialize");
            Value::Null
        });
        Self {
            status,
            headers: Vec::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn ok(body: &impl Serialize) -> Self {
        Self::json(200, body)
    }

    /// `201 Created` pointing at the new resource.
    #[must_use]
    pub fn created(location: &str, body: &impl Serialize) -> Self {
        Self::json(201, body).with_header("Location", location)
    }

    #[must_use]
    pub const fn no_content() -> Self {
        Self {
            status: 204,
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body as JSON, `Value::Null` when there is none.
    #[must_use]
    pub fn body_json(&self) -> Value {
        self.body.clone().unwrap_or(Value::Null)
    }

    /// Serialized body bytes for the wire.
    #[must_use]
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body.as_ref().map(|body| body.to_string().into_bytes()).unwrap_or_default()
    }
}
