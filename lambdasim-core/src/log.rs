//! Invocation-scoped log transcript.
//!
//! Every invocation owns one [`InvocationLog`]. Lines written through it are
//! stamped with a timestamp and the request id, kept in order, and forwarded
//! to the process-wide `tracing` sink under [`LOG_TARGET`].
//!
//! While a [`CaptureWindow`] is open the transcript is also reachable by
//! request id through [`InvocationLog::active`]. A `tracing` layer uses that
//! lookup to pull events emitted inside the invocation span into the right
//! transcript, so overlapping invocations never mix their lines.

use chrono::{SecondsFormat, Utc};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError},
};
use tracing::Level;

/// Target of the `tracing` events forwarded from a transcript.
pub const LOG_TARGET: &str = "lambdasim::function";

/// Name of the span the engine wraps each handler call in.
pub const INVOCATION_SPAN: &str = "invocation";

/// Field of [`INVOCATION_SPAN`] holding the request id.
pub const REQUEST_ID_FIELD: &str = "request_id";

static ACTIVE: LazyLock<Mutex<HashMap<String, InvocationLog>>> = LazyLock::new(Default::default);

fn active_table() -> MutexGuard<'static, HashMap<String, InvocationLog>> {
    ACTIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered log transcript of one invocation.
#[derive(Clone)]
pub struct InvocationLog {
    request_id: Arc<str>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl InvocationLog {
    /// Create an empty transcript for `request_id`.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Arc::from(request_id.into()),
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Request id stamped on every line.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Record an `INFO` line.
    pub fn info(&self, message: impl fmt::Display) {
        self.record(Level::INFO, message);
    }

    /// Record a `WARN` line.
    pub fn warn(&self, message: impl fmt::Display) {
        self.record(Level::WARN, message);
    }

    /// Record an `ERROR` line.
    pub fn error(&self, message: impl fmt::Display) {
        self.record(Level::ERROR, message);
    }

    /// Record a stamped line and forward it to `tracing`.
    pub fn record(&self, level: Level, message: impl fmt::Display) {
        let message = message.to_string();
        self.capture(level, &message);
        forward(level, &self.request_id, &message);
    }

    /// Record a stamped line without forwarding it.
    ///
    /// Used for events that already went through `tracing`.
    pub fn capture(&self, level: Level, message: &str) {
        let line = format!(
            "{}\t{}\t{}\t{}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            self.request_id,
            level,
            message
        );
        self.lock().push(line);
    }

    /// Record an unstamped line (START, END, REPORT) and forward it.
    pub fn raw(&self, line: impl Into<String>) {
        let line = line.into();
        forward(Level::INFO, &self.request_id, &line);
        self.lock().push(line);
    }

    /// Snapshot of the lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// All lines joined with `\n`.
    pub fn transcript(&self) -> String {
        self.lock().join("\n")
    }

    /// Make this transcript reachable through [`InvocationLog::active`] until
    /// the returned window is dropped.
    pub fn open_window(&self) -> CaptureWindow {
        active_table().insert(self.request_id.to_string(), self.clone());
        CaptureWindow { log: self.clone() }
    }

    /// The transcript of the invocation `request_id`, if its window is open.
    pub fn active(request_id: &str) -> Option<InvocationLog> {
        active_table().get(request_id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for InvocationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationLog")
            .field("request_id", &self.request_id)
            .field("lines", &self.lock().len())
            .finish()
    }
}

/// Guard keeping a transcript registered for capture.
#[must_use = "capture stops as soon as the window is dropped"]
#[derive(Debug)]
pub struct CaptureWindow {
    log: InvocationLog,
}

impl Drop for CaptureWindow {
    fn drop(&mut self) {
        active_table().remove(self.log.request_id());
    }
}

fn forward(level: Level, request_id: &str, message: &str) {
    match level {
        Level::ERROR => tracing::error!(target: LOG_TARGET, request_id, "{message}"),
        Level::WARN => tracing::warn!(target: LOG_TARGET, request_id, "{message}"),
        Level::INFO => tracing::info!(target: LOG_TARGET, request_id, "{message}"),
        Level::DEBUG => tracing::debug!(target: LOG_TARGET, request_id, "{message}"),
        _ => tracing::trace!(target: LOG_TARGET, request_id, "{message}"),
    }
}
