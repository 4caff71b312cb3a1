//! Error types for lambdasim.
//!
//! - [`FunctionError`] - A handler-level failure, carried as data in the response body
//! - [`TemplateError`] - An unusable URL template handed to a transform

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{any::Any, backtrace::Backtrace, backtrace::BacktraceStatus, fmt};
use thiserror::Error;

/// Kind reported for handler panics.
pub const PANIC_KIND: &str = "Panic";

/// A failure raised by a function handler.
///
/// The engine never propagates this; it becomes the response body, serialized
/// with the platform's field names (`errorMessage`, `errorType`, `stackTrace`).
///
/// Any `std::error::Error` converts into a `FunctionError` through `?`, which
/// records the error's short type name as the kind and captures the caller
/// frames at the conversion point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionError {
    #[serde(rename = "errorMessage")]
    message: String,
    #[serde(rename = "errorType")]
    kind: String,
    #[serde(rename = "stackTrace")]
    frames: Vec<String>,
}

impl FunctionError {
    /// Create an error with an explicit kind and message.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        let kind = kind.into();
        let message = message.into();
        let frames = capture_frames().unwrap_or_else(|| vec![format!("{kind}: {message}")]);
        Self {
            message,
            kind,
            frames,
        }
    }

    /// Create a plain `Error` kind from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    /// Convert a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "handler panicked".to_string()
        };
        Self::new(PANIC_KIND, message)
    }

    /// Replace the captured frames.
    ///
    /// An empty list keeps the current frames.
    pub fn with_frames(mut self, frames: Vec<String>) -> Self {
        if !frames.is_empty() {
            self.frames = frames;
        }
        self
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error kind (type name).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Caller frames, innermost first. Never empty.
    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// The structured body the engine returns for this error.
    pub fn to_value(&self) -> Value {
        json!({
            "errorMessage": self.message,
            "errorType": self.kind,
            "stackTrace": self.frames,
        })
    }
}

impl fmt::Display for FunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl<E> From<E> for FunctionError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        let kind = short_type_name::<E>();
        let message = error.to_string();

        let mut chain = vec![format!("{kind}: {message}")];
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            frames: capture_frames().unwrap_or(chain),
            message,
            kind,
        }
    }
}

/// Errors raised while building a URL template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template could not be compiled into a matcher.
    #[error("invalid URL template `{template}`: {reason}")]
    Invalid {
        /// The template as supplied.
        template: String,
        /// Why the matcher rejected it.
        reason: String,
    },
}

fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Frames belonging to the capture and panic machinery.
const SKIPPED_FRAMES: &[&str] = &[
    "std::backtrace",
    "lambdasim_core::error",
    "<lambdasim_core::error",
    "<T as core::convert::Into<U>>",
    "lambdasim_std::unwind",
    "<alloc::boxed::Box<F",
    "core::ops::function",
    "std::panicking",
    "core::panicking",
    "std::sys",
    "rust_begin_unwind",
    "__rustc::rust_begin_unwind",
];

/// Caller frames at this point, innermost first, without the capture
/// machinery's own frames. `None` when no symbolized backtrace is available.
pub fn capture_frames() -> Option<Vec<String>> {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return None;
    }
    let frames = parse_frames(&backtrace.to_string());
    (!frames.is_empty()).then_some(frames)
}

/// Reduce a rendered backtrace to `function (location)` strings.
fn parse_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    let mut skipping = false;

    for line in rendered.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            if !skipping {
                if let Some(last) = frames.last_mut() {
                    last.push_str(&format!(" ({location})"));
                }
            }
            continue;
        }
        let Some((index, function)) = line.split_once(": ") else {
            continue;
        };
        if index.parse::<usize>().is_err() {
            continue;
        }
        skipping = SKIPPED_FRAMES.iter().any(|prefix| function.starts_with(prefix));
        if !skipping {
            frames.push(function.to_string());
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "inner cause")
        }
    }

    impl std::error::Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "outer failure")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_from_std_error_uses_short_type_name() {
        let error: FunctionError = Outer(Inner).into();
        assert_eq!(error.kind(), "Outer");
        assert_eq!(error.message(), "outer failure");
        assert!(!error.frames().is_empty());
    }

    #[test]
    fn test_io_error_kind() {
        let error = FunctionError::from(std::io::Error::other("disk gone"));
        assert_eq!(error.kind(), "Error");
        assert_eq!(error.message(), "disk gone");
    }

    #[test]
    fn test_from_panic_payloads() {
        let error = FunctionError::from_panic(Box::new("boom"));
        assert_eq!(error.kind(), PANIC_KIND);
        assert_eq!(error.message(), "boom");

        let error = FunctionError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(error.message(), "owned boom");

        let error = FunctionError::from_panic(Box::new(42_u8));
        assert_eq!(error.message(), "handler panicked");
    }

    #[test]
    fn test_wire_shape() {
        let error = FunctionError::new("TypeError", "bad input").with_frames(vec!["handler".into()]);
        let value = error.to_value();
        assert_eq!(value["errorMessage"], "bad input");
        assert_eq!(value["errorType"], "TypeError");
        assert_eq!(value["stackTrace"], json!(["handler"]));
        assert_eq!(serde_json::to_value(&error).unwrap(), value);
    }

    #[test]
    fn test_with_empty_frames_keeps_existing() {
        let error = FunctionError::msg("x").with_frames(Vec::new());
        assert!(!error.frames().is_empty());
    }

    #[test]
    fn test_parse_frames() {
        let rendered = "   0: std::backtrace::Backtrace::force_capture\n             at /rustc/library/std/src/backtrace.rs:312:13\n   1: lambdasim_core::error::capture_frames\n   2: my_fn::handler\n             at ./src/main.rs:10:5\n   3: tokio::runtime::park\n";
        assert_eq!(
            parse_frames(rendered),
            vec![
                "my_fn::handler (./src/main.rs:10:5)".to_string(),
                "tokio::runtime::park".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_frames_skips_panic_machinery() {
        let rendered = "   0: lambdasim_std::unwind::install::{{closure}}\n   1: <alloc::boxed::Box<F,A> as core::ops::function::Fn<Args>>::call\n   2: std::panicking::rust_panic_with_hook\n   3: std::sys::backtrace::__rust_end_short_backtrace\n   4: __rustc::rust_begin_unwind\n   5: core::panicking::panic_fmt\n   6: orders::validate\n             at ./src/lib.rs:3:9\n";
        assert_eq!(parse_frames(rendered), vec!["orders::validate (./src/lib.rs:3:9)".to_string()]);
    }

    #[test]
    fn test_display() {
        assert_eq!(FunctionError::new("RangeError", "too big").to_string(), "RangeError: too big");
    }
}
