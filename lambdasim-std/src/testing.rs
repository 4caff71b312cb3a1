//! Testing utilities for lambdasim.
//!
//! Ready-made handlers for exercising the engine and transforms.
//!
//! # Features
//!
//! - [`EchoHandler`]: Returns the event it receives
//! - [`RecordingHandler`]: Records every event and request id it sees
//! - [`CountingHandler`]: Counts invocations
//! - [`FailingHandler`]: Always fails with a fixed error

use lambdasim_core::{Callback, Context, FunctionError, Handler};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Echo Handler
// ============================================================================

/// A handler that returns its event unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    type Output = Value;

    async fn call(&self, event: Value, _context: Context, _callback: Callback) -> Self::Output {
        event
    }
}

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records every invocation and returns `null`.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new();
/// let simulator = Simulator::new(recorder.clone());
///
/// simulator.get("/items?page=2").await;
///
/// assert_eq!(recorder.events(), vec![json!({"page": "2"})]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<Value>>>,
    request_ids: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().unwrap().clone()
    }

    /// Request ids seen so far.
    pub fn request_ids(&self) -> Vec<String> {
        self.request_ids.lock().unwrap().clone()
    }

    /// Get the number of recorded invocations.
    pub fn count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Clear everything recorded.
    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
        self.request_ids.lock().unwrap().clear();
    }
}

impl Handler for RecordingHandler {
    type Output = ();

    async fn call(&self, event: Value, context: Context, _callback: Callback) -> Self::Output {
        self.events.lock().unwrap().push(event);
        self.request_ids
            .lock()
            .unwrap()
            .push(context.request_id().to_string());
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// let simulator = Simulator::new(counter.clone());
///
/// simulator.get("/").await;
///
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Handler for CountingHandler {
    type Output = ();

    async fn call(&self, _event: Value, _context: Context, _callback: Callback) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that always fails with the same kind and message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    kind: String,
    message: String,
}

impl FailingHandler {
    /// Create a handler failing with `kind` and `message`.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl Handler for FailingHandler {
    type Output = Result<Value, FunctionError>;

    async fn call(&self, _event: Value, _context: Context, _callback: Callback) -> Self::Output {
        Err(FunctionError::new(self.kind.as_str(), self.message.as_str()))
    }
}
