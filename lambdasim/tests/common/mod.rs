#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::STANDARD};
use lambdasim::{
    CaptureLayer, FunctionError, Handler, LOG_RESULT_HEADER, ResponseEnvelope, Callback, Context,
};
use serde_json::Value;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Transcript Helpers
// ============================================================================

/// Decode the log transcript header into its lines.
pub fn transcript(envelope: &ResponseEnvelope) -> Vec<String> {
    let encoded = envelope
        .header(LOG_RESULT_HEADER)
        .expect("log result header");
    let decoded = STANDARD.decode(encoded).expect("valid base64");
    String::from_utf8(decoded)
        .expect("utf-8 transcript")
        .lines()
        .map(String::from)
        .collect()
}

/// Install a thread-local subscriber with the capture layer.
pub fn capture_logs() -> DefaultGuard {
    tracing::subscriber::set_default(tracing_subscriber::registry().with(CaptureLayer::new()))
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Calls the callback with `{"via": "callback"}`, then fails.
pub struct CallbackThenThrow;

impl Handler for CallbackThenThrow {
    type Output = Result<Value, FunctionError>;

    async fn call(&self, _event: Value, _context: Context, callback: Callback) -> Self::Output {
        callback.succeed(serde_json::json!({"via": "callback"}));
        Err(FunctionError::new("TypeError", "thrown after callback"))
    }
}

/// Logs one line through the context and one through `tracing`, then returns the event.
pub struct ChattyHandler;

impl Handler for ChattyHandler {
    type Output = Value;

    async fn call(&self, event: Value, context: Context, _callback: Callback) -> Self::Output {
        context.log().info("via context");
        tracing::info!(items = 2, "via tracing");
        event
    }
}
