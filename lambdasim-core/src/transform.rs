//! # Transform Pipeline
//!
//! A [`Transform`] reshapes the inbound request into the handler's event and
//! post-processes the envelope the engine produces, letting the simulator
//! emulate a specific platform integration without the engine knowing about it.
//!
//! - [`Passthrough`] - the default: merged query/body event, envelope unchanged
//! - [`FnTransform`] - a pair of closures

use crate::{envelope::ResponseEnvelope, request::InboundRequest};
use serde_json::Value;
use std::sync::Arc;

/// A request/response transformer pair.
///
/// Both operations are pure and infallible: a transform that cannot make sense
/// of its input answers with an envelope describing the problem.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Transform`",
    label = "missing `Transform` implementation",
    note = "Transforms must implement `transform_request` and `transform_response`."
)]
pub trait Transform: Send + Sync + 'static {
    /// Build the handler event for `request`.
    fn transform_request(&self, request: &InboundRequest) -> Value;

    /// Rewrite the envelope produced by the engine.
    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn transform_request(&self, request: &InboundRequest) -> Value {
        (**self).transform_request(request)
    }

    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        (**self).transform_response(envelope)
    }
}

impl<T: Transform + ?Sized> Transform for Arc<T> {
    fn transform_request(&self, request: &InboundRequest) -> Value {
        (**self).transform_request(request)
    }

    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        (**self).transform_response(envelope)
    }
}

/// The transform used when none is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Transform for Passthrough {
    fn transform_request(&self, request: &InboundRequest) -> Value {
        request.default_event()
    }

    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        envelope
    }
}

/// A transform built from two closures.
///
/// # Example
///
/// ```rust
/// use lambdasim_core::{FnTransform, InboundRequest, ResponseEnvelope};
/// use serde_json::json;
///
/// let transform = FnTransform::new(
///     |request: &InboundRequest| json!({ "method": request.method() }),
///     |envelope: ResponseEnvelope| envelope.with_status(201),
/// );
/// ```
#[derive(Clone)]
pub struct FnTransform<Req, Resp> {
    request: Req,
    response: Resp,
}

impl<Req, Resp> FnTransform<Req, Resp> {
    /// Create a transform from a request and a response closure.
    pub fn new(request: Req, response: Resp) -> Self {
        Self { request, response }
    }
}

impl<Req, Resp> Transform for FnTransform<Req, Resp>
where
    Req: Fn(&InboundRequest) -> Value + Send + Sync + 'static,
    Resp: Fn(ResponseEnvelope) -> ResponseEnvelope + Send + Sync + 'static,
{
    fn transform_request(&self, request: &InboundRequest) -> Value {
        (self.request)(request)
    }

    fn transform_response(&self, envelope: ResponseEnvelope) -> ResponseEnvelope {
        (self.response)(envelope)
    }
}
