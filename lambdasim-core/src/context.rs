//! Per-invocation identity handed to the handler.

use crate::log::InvocationLog;
use std::sync::Arc;
use uuid::Uuid;

/// Metadata of one invocation.
///
/// A fresh context, with a fresh request id and an empty transcript, is built
/// for every call. Cloning is cheap and clones share the transcript.
#[derive(Debug, Clone)]
pub struct Context {
    request_id: String,
    function_name: Arc<str>,
    function_version: Arc<str>,
    log: InvocationLog,
}

impl Context {
    /// Create a context with a newly generated request id.
    pub fn new(function_name: impl Into<Arc<str>>, function_version: impl Into<Arc<str>>) -> Self {
        let request_id = Uuid::new_v4().to_string();
        Self {
            log: InvocationLog::new(request_id.clone()),
            request_id,
            function_name: function_name.into(),
            function_version: function_version.into(),
        }
    }

    /// Unique id of this invocation.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Name of the simulated function.
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Version of the simulated function.
    pub fn function_version(&self) -> &str {
        &self.function_version
    }

    /// The invocation's log transcript.
    pub fn log(&self) -> &InvocationLog {
        &self.log
    }

    /// Legacy completion method. Does nothing.
    ///
    /// Handlers written against the old `context.succeed(result)` style still
    /// run; completion is decided by the returned value or the callback.
    pub fn succeed<T>(&self, _result: T) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let first = Context::new("fn", "1");
        let second = Context::new("fn", "1");
        assert_ne!(first.request_id(), second.request_id());
        assert!(!first.request_id().is_empty());
    }

    #[test]
    fn test_log_is_stamped_with_request_id() {
        let context = Context::new("fn", "$LATEST");
        context.log().info("hi");
        assert!(context.log().lines()[0].contains(context.request_id()));
        assert_eq!(context.log().request_id(), context.request_id());
    }

    #[test]
    fn test_succeed_is_noop() {
        let context = Context::new("fn", "$LATEST");
        context.succeed(serde_json::json!({"ok": true}));
        assert!(context.log().lines().is_empty());
        assert_eq!(context.function_name(), "fn");
        assert_eq!(context.function_version(), "$LATEST");
    }
}
