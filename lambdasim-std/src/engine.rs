//! # Invocation Engine
//!
//! Turns one inbound request into exactly one [`ResponseEnvelope`]:
//!
//! 1. build the event (through the installed [`Transform`])
//! 2. create a fresh [`Context`], write the START line and open log capture
//! 3. call the handler once, inside an `invocation` span, catching panics
//! 4. reconcile callback, return value and failure in a [`CompletionSlot`]
//! 5. close capture, write END and REPORT
//! 6. wrap the body with the default headers and pass it through the transform
//!
//! Handler failures never escape: they become the response body and the
//! status stays 200.

use crate::{config::SimulatorConfig, unwind};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use lambdasim_core::{
    CONTENT_TYPE_HEADER, CompletionSlot, Context, EXECUTED_VERSION_HEADER, Handler,
    Headers, INVOCATION_SPAN, InboundRequest, IntoOutcome, InvocationLog, JSON_CONTENT_TYPE,
    LOG_RESULT_HEADER, Passthrough, REQUEST_ID_HEADER, Resolution, ResponseEnvelope, Transform,
};
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::Instrument;

/// Runs a [`Handler`] locally, one invocation per request.
///
/// Invocations take `&self` and keep all per-call state in their own
/// [`Context`], so overlapping invocations on one simulator are fine.
///
/// # Example
///
/// ```rust,ignore
/// let simulator = Simulator::new(|event: Value, _ctx: Context, _cb: Callback| async move { event });
/// let response = simulator.post("/orders?id=7", json!({"qty": 2})).await;
/// assert_eq!(response.body(), Some(&json!({"id": "7", "qty": 2})));
/// ```
pub struct Simulator<H, T = Passthrough> {
    handler: H,
    transform: T,
    config: SimulatorConfig,
}

impl<H: Handler> Simulator<H> {
    /// Simulator with the default configuration and no transform.
    pub fn new(handler: H) -> Self {
        Self::builder(handler).build()
    }

    /// Start configuring a simulator.
    pub fn builder(handler: H) -> SimulatorBuilder<H> {
        SimulatorBuilder {
            handler,
            transform: Passthrough,
            config: SimulatorConfig::default(),
        }
    }
}

impl<H: Handler, T: Transform> Simulator<H, T> {
    /// The simulator's configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// The installed transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Invoke as a `GET` request: the body is an empty object.
    pub async fn get(&self, url: &str) -> ResponseEnvelope {
        self.invoke("GET", url, Value::Object(Map::new()), Headers::new())
            .await
    }

    /// Invoke as a `POST` request with `body`.
    pub async fn post(&self, url: &str, body: Value) -> ResponseEnvelope {
        self.invoke("POST", url, body, Headers::new()).await
    }

    /// Invoke the handler once. Never fails.
    pub async fn invoke(
        &self,
        method: &str,
        url: &str,
        body: Value,
        headers: Headers,
    ) -> ResponseEnvelope {
        let request = InboundRequest::new(method, url, body, headers);
        self.invoke_request(&request).await
    }

    /// Invoke the handler once for an already built request.
    pub async fn invoke_request(&self, request: &InboundRequest) -> ResponseEnvelope {
        let event = self.transform.transform_request(request);

        let context = Context::new(
            self.config.function_name.as_str(),
            self.config.function_version.as_str(),
        );
        let log = context.log().clone();
        let request_id = context.request_id().to_string();
        let version = context.function_version().to_string();

        tracing::debug!(
            request_id = %request_id,
            method = request.method(),
            url = request.url(),
            "invocation started"
        );
        log.raw(format!("START RequestId: {request_id} Version: {version}"));
        let window = log.open_window();
        let span = tracing::info_span!(INVOCATION_SPAN, request_id = %request_id);

        let slot = CompletionSlot::new();
        let callback = slot.callback();
        let handler = &self.handler;
        let started = Instant::now();

        let returned = unwind::catch_panic(async move { handler.call(event, context, callback).await })
            .instrument(span)
            .await
            .and_then(IntoOutcome::into_outcome);

        let Resolution { outcome, discarded } = slot.resolve(returned);
        if let Some(error) = discarded {
            log.warn(format_args!(
                "handler error ignored after callback completion: {error}"
            ));
        }

        let duration = started.elapsed();
        drop(window);
        log.raw(format!("END RequestId: {request_id}"));
        log.raw(format!(
            "REPORT RequestId: {request_id} Duration: {:.2} ms",
            duration.as_secs_f64() * 1000.0
        ));

        let body = match outcome {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(request_id = %request_id, %error, "handler failed");
                Some(error.to_value())
            }
        };
        tracing::debug!(request_id = %request_id, ?duration, "invocation finished");

        let envelope =
            ResponseEnvelope::new(200, body, default_headers(&request_id, &version, &log));
        self.transform.transform_response(envelope)
    }
}

fn default_headers(request_id: &str, version: &str, log: &InvocationLog) -> Headers {
    Headers::from([
        (REQUEST_ID_HEADER.to_string(), request_id.to_string()),
        (CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()),
        (LOG_RESULT_HEADER.to_string(), STANDARD.encode(log.transcript())),
        (EXECUTED_VERSION_HEADER.to_string(), version.to_string()),
    ])
}

/// Builder for [`Simulator`].
pub struct SimulatorBuilder<H, T = Passthrough> {
    handler: H,
    transform: T,
    config: SimulatorConfig,
}

impl<H: Handler, T: Transform> SimulatorBuilder<H, T> {
    /// Set the function name.
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.config.function_name = name.into();
        self
    }

    /// Set the function version.
    pub fn function_version(mut self, version: impl Into<String>) -> Self {
        self.config.function_version = version.into();
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a transform.
    pub fn transform<U: Transform>(self, transform: U) -> SimulatorBuilder<H, U> {
        SimulatorBuilder {
            handler: self.handler,
            transform,
            config: self.config,
        }
    }

    /// Build the simulator.
    pub fn build(self) -> Simulator<H, T> {
        Simulator {
            handler: self.handler,
            transform: self.transform,
            config: self.config,
        }
    }
}
