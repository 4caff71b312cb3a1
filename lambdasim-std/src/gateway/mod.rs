//! # Gateway Proxy Integration
//!
//! A [`Transform`] emulating an HTTP API gateway's proxy integration with a
//! function.
//!
//! **Request side**: the handler receives a proxy event with `httpMethod`,
//! `path`, the JSON body re-encoded as a string, `pathParameters` extracted
//! from an optional [`PathTemplate`], `queryStringParameters`, `headers` and
//! `multiValueHeaders`.
//!
//! **Response side**: the handler must answer with
//! `{ statusCode?, headers?, multiValueHeaders?, body: "<JSON string>" }`.
//! The declared status, headers and parsed body become the response. A
//! response that breaks this contract yields a 502 with
//! [`MALFORMED_RESPONSE`] instead of an error.

mod request;
mod response;
mod template;

pub use lambdasim_core::MultiValueHeaders;
pub use request::multi_value_headers;
pub use response::{ContractViolation, MALFORMED_RESPONSE, MISSING_BODY};
pub use template::{PathParams, PathTemplate};

use lambdasim_core::{InboundRequest, ResponseEnvelope, TemplateError, Transform};
use serde_json::Value;

/// Status returned for a malformed proxy response.
pub const BAD_GATEWAY: u16 = 502;

/// The gateway proxy integration transform.
#[derive(Debug, Default)]
pub struct GatewayProxy {
    template: Option<PathTemplate>,
}

impl GatewayProxy {
    /// A proxy without a URL template; `pathParameters` is always empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// A proxy extracting path parameters with `template`.
    pub fn with_template(template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            template: Some(PathTemplate::parse(template)?),
        })
    }

    /// The URL template, if any.
    pub fn template(&self) -> Option<&PathTemplate> {
        self.template.as_ref()
    }
}

impl Transform for GatewayProxy {
    fn transform_request(&self, request: &InboundRequest) -> Value {
        request::proxy_event(request, self.template.as_ref())
    }

    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        match response::proxy_response(envelope.body(), envelope.headers()) {
            Ok(transformed) => transformed,
            Err(violation) => {
                tracing::warn!(%violation, "handler broke the proxy response contract");
                let (_, _, headers) = envelope.into_parts();
                ResponseEnvelope::new(
                    BAD_GATEWAY,
                    Some(Value::String(MALFORMED_RESPONSE.to_string())),
                    headers,
                )
            }
        }
    }
}
