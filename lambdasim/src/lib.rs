//! # lambdasim - Local Function Invocation Simulator
//!
//! `lambdasim` runs request/response serverless function handlers on your
//! machine. Each request invokes the handler once, with a fresh context and a
//! completion callback, and comes back as a [`ResponseEnvelope`] carrying the
//! invocation's request id, version and captured log transcript.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lambdasim::prelude::*;
//! use serde_json::{Value, json};
//!
//! let simulator = Simulator::new(|event: Value, context: Context, _callback: Callback| async move {
//!     context.log().info("handling");
//!     json!({ "received": event })
//! });
//!
//! let response = simulator.post("/orders?id=7", json!({ "qty": 2 })).await;
//! assert_eq!(response.status_code(), 200);
//! ```
//!
//! ## Gateway Proxy
//!
//! Install [`GatewayProxy`] to hand the handler a proxy event and interpret
//! its `{ statusCode, headers, body }` answer:
//!
//! ```rust,ignore
//! let simulator = Simulator::builder(handler)
//!     .transform(GatewayProxy::with_template("/orders/{id}")?)
//!     .build();
//! ```
//!
//! ## HTTP
//!
//! With the `http` feature (on by default), [`http::serve`] exposes a
//! simulator on a local port.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use lambdasim_core::{
    // Completion
    Callback,
    Completion,
    CompletionSlot,
    // Context / Logging
    CaptureWindow,
    Context,
    // Envelope
    CONTENT_TYPE_HEADER,
    EXECUTED_VERSION_HEADER,
    // Transform
    FnTransform,
    // Errors
    FunctionError,
    // Handler
    Handler,
    Headers,
    INVOCATION_SPAN,
    // Request
    InboundRequest,
    IntoOutcome,
    InvocationLog,
    JSON_CONTENT_TYPE,
    Json,
    LOG_RESULT_HEADER,
    LOG_TARGET,
    MultiValueHeaders,
    Outcome,
    PANIC_KIND,
    Passthrough,
    QueryParams,
    REQUEST_ID_FIELD,
    REQUEST_ID_HEADER,
    Reconciled,
    Resolution,
    ResponseEnvelope,
    Signal,
    SyncHandler,
    TemplateError,
    Transform,
    capture_frames,
    parse_query,
};

pub use lambdasim_std::{
    CaptureLayer, GatewayProxy, PathTemplate, Simulator, SimulatorBuilder, SimulatorConfig,
};

#[cfg(feature = "http")]
pub mod http;

/// Simulator configuration.
pub mod config {
    pub use lambdasim_std::config::{
        DEFAULT_FUNCTION_NAME, DEFAULT_FUNCTION_VERSION, FUNCTION_NAME_ENV, FUNCTION_VERSION_ENV,
        SimulatorConfig,
    };
}

/// Gateway proxy integration.
pub mod gateway {
    pub use lambdasim_std::gateway::{
        BAD_GATEWAY, ContractViolation, GatewayProxy, MALFORMED_RESPONSE, MISSING_BODY,
        MultiValueHeaders, PathParams, PathTemplate, multi_value_headers,
    };
}

/// Process-wide `tracing` setup.
pub mod logging {
    pub use lambdasim_std::logging::{DEFAULT_FILTER, init, try_init};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use lambdasim_std::testing::*;
}

/// Prelude module - common imports for lambdasim.
///
/// # Usage
///
/// ```rust,ignore
/// use lambdasim::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Callback, Context, FunctionError, GatewayProxy, Handler, IntoOutcome, Json,
        ResponseEnvelope, Simulator, SyncHandler, Transform,
    };
}
