//! # lambdasim-core
//!
//! Core types and traits for the lambdasim invocation simulator.
//!
//! This crate has minimal dependencies and is what handler crates and custom
//! transforms depend on. The engine itself lives in `lambdasim-std`.
//!
//! # Building Blocks
//!
//! - [`Handler`] - the function under test, called with `(event, context, callback)`
//! - [`Context`] - per-invocation identity and its [`InvocationLog`]
//! - [`Callback`] / [`CompletionSlot`] - reconciliation of callback, return and failure
//! - [`IntoOutcome`] - what a handler may return
//! - [`Transform`] - request/response rewriting pair ([`Passthrough`], [`FnTransform`])
//! - [`InboundRequest`] / [`ResponseEnvelope`] - what goes in and what comes out
//!
//! # Error Types
//!
//! - [`FunctionError`] - a handler failure, returned as data
//! - [`TemplateError`] - an unusable URL template

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod completion;
mod context;
mod envelope;
mod error;
mod handler;
mod log;
mod outcome;
mod request;
mod transform;

// Re-exports
pub use completion::{Callback, Completion, CompletionSlot, Reconciled, Resolution, Signal};
pub use context::Context;
pub use envelope::{
    CONTENT_TYPE_HEADER, EXECUTED_VERSION_HEADER, Headers, JSON_CONTENT_TYPE, LOG_RESULT_HEADER,
    MultiValueHeaders, REQUEST_ID_HEADER, ResponseEnvelope,
};
pub use error::{FunctionError, PANIC_KIND, TemplateError, capture_frames};
pub use handler::{Handler, SyncHandler};
pub use log::{CaptureWindow, INVOCATION_SPAN, InvocationLog, LOG_TARGET, REQUEST_ID_FIELD};
pub use outcome::{IntoOutcome, Json, Outcome};
pub use request::{InboundRequest, QueryParams, parse_query};
pub use transform::{FnTransform, Passthrough, Transform};
