//! The normalized response of one invocation.

use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Header name to value mapping. Keys are case-sensitive as provided.
pub type Headers = BTreeMap<String, String>;

/// Header name to ordered values mapping.
pub type MultiValueHeaders = BTreeMap<String, Vec<String>>;

/// Header carrying the invocation's request id.
pub const REQUEST_ID_HEADER: &str = "x-amzn-RequestId";
/// Content type header.
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
/// Content type of every engine-produced body.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Header carrying the base64-encoded log transcript.
pub const LOG_RESULT_HEADER: &str = "X-Amz-Log-Result";
/// Header carrying the executed function version.
pub const EXECUTED_VERSION_HEADER: &str = "X-Amz-Executed-Version";

/// Status code, body and headers handed back to the transport.
///
/// Envelopes are never mutated in place: the `with_*` methods consume the
/// envelope and return a new one, so a transform always produces a fresh value.
///
/// A `None` body means "no body"; it is distinct from `Some(Value::Null)`.
///
/// `headers` holds one value per name. A header that must reach the wire as
/// several fields (`Set-Cookie`) also has its individual values in
/// `multi_value_headers`; its `headers` entry is those values joined with `", "`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    status_code: u16,
    body: Option<Value>,
    headers: Headers,
    multi_value_headers: MultiValueHeaders,
}

impl ResponseEnvelope {
    /// Create an envelope.
    pub fn new(status_code: u16, body: Option<Value>, headers: Headers) -> Self {
        Self {
            status_code,
            body,
            headers,
            multi_value_headers: MultiValueHeaders::new(),
        }
    }

    /// A 200 envelope with the given body and no headers.
    pub fn ok(body: Option<Value>) -> Self {
        Self::new(200, body, Headers::new())
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Headers carrying several values, by name.
    pub fn multi_value_headers(&self) -> &MultiValueHeaders {
        &self.multi_value_headers
    }

    /// Look up one header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Split into status, body and headers. Multi-value entries are dropped;
    /// their joined form stays in the headers.
    pub fn into_parts(self) -> (u16, Option<Value>, Headers) {
        (self.status_code, self.body, self.headers)
    }

    /// Same envelope with another status code.
    pub fn with_status(self, status_code: u16) -> Self {
        Self {
            status_code,
            ..self
        }
    }

    /// Same envelope with another body.
    pub fn with_body(self, body: Option<Value>) -> Self {
        Self { body, ..self }
    }

    /// Same envelope with another header set, multi-value headers cleared.
    pub fn with_headers(self, headers: Headers) -> Self {
        Self {
            headers,
            multi_value_headers: MultiValueHeaders::new(),
            ..self
        }
    }

    /// Same envelope with one header added or replaced.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.multi_value_headers.remove(&name);
        self.headers.insert(name, value.into());
        self
    }

    /// Same envelope with a header carrying several values.
    pub fn with_multi_value_header(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        let name = name.into();
        self.headers.insert(name.clone(), values.join(", "));
        self.multi_value_headers.insert(name, values);
        self
    }
}

impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "HTTP {}: {}", self.status_code, body),
            None => write!(f, "HTTP {}: undefined", self.status_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders_return_new_values() {
        let original = ResponseEnvelope::ok(Some(json!({"a": 1})));
        let changed = original
            .clone()
            .with_status(404)
            .with_header("X-Test", "yes")
            .with_body(None);

        assert_eq!(original.status_code(), 200);
        assert_eq!(original.body(), Some(&json!({"a": 1})));
        assert!(original.headers().is_empty());

        assert_eq!(changed.status_code(), 404);
        assert_eq!(changed.body(), None);
        assert_eq!(changed.header("X-Test"), Some("yes"));
        assert_eq!(changed.header("x-test"), None);
    }

    #[test]
    fn test_absent_body_differs_from_null() {
        assert_ne!(
            ResponseEnvelope::ok(None),
            ResponseEnvelope::ok(Some(Value::Null))
        );
    }

    #[test]
    fn test_multi_value_header() {
        let envelope = ResponseEnvelope::ok(None)
            .with_multi_value_header("Set-Cookie", vec!["a=1".into(), "b=2".into()]);
        assert_eq!(envelope.header("Set-Cookie"), Some("a=1, b=2"));
        assert_eq!(envelope.multi_value_headers()["Set-Cookie"], vec!["a=1", "b=2"]);

        let replaced = envelope.with_header("Set-Cookie", "c=3");
        assert_eq!(replaced.header("Set-Cookie"), Some("c=3"));
        assert!(replaced.multi_value_headers().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ResponseEnvelope::ok(Some(json!({"field": "value"}))).to_string(),
            r#"HTTP 200: {"field":"value"}"#
        );
        assert_eq!(ResponseEnvelope::ok(None).to_string(), "HTTP 200: undefined");
    }
}
