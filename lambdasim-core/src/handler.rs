//! # Function Handler
//!
//! The user code under test. A handler receives the event, the invocation
//! [`Context`] and a completion [`Callback`], and finishes in any of three ways:
//!
//! 1. **Return**: the future resolves to a value convertible via [`IntoOutcome`]
//! 2. **Callback**: `callback.succeed(..)` / `callback.fail(..)`, which takes
//!    precedence over whatever the future later returns
//! 3. **Fail**: the future resolves to `Err(..)` or panics
//!
//! # Usage Patterns
//!
//! 1. **Async closure**: `|event, context, callback| async move { ... }`
//! 2. **Struct implementation**: `impl Handler for MyHandler`
//! 3. **Synchronous function**: `SyncHandler::new(|event, context, callback| ...)`

use crate::{completion::Callback, context::Context, outcome::IntoOutcome};
use serde_json::Value;
use std::future::Future;

/// A request/response function handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a function handler",
    label = "missing `Handler` implementation",
    note = "Handlers take `(serde_json::Value, Context, Callback)` and return a future whose output implements `IntoOutcome`."
)]
pub trait Handler: Send + Sync + 'static {
    /// The handler's own result, usually `Value`, `()` or a `Result` of those.
    type Output: IntoOutcome;

    /// Run the handler for one invocation.
    fn call(
        &self,
        event: Value,
        context: Context,
        callback: Callback,
    ) -> impl Future<Output = Self::Output> + Send;
}

// Blanket impl for async closures
impl<F, Fut> Handler for F
where
    F: Fn(Value, Context, Callback) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoOutcome,
{
    type Output = Fut::Output;

    fn call(
        &self,
        event: Value,
        context: Context,
        callback: Callback,
    ) -> impl Future<Output = Self::Output> + Send {
        (self)(event, context, callback)
    }
}

/// Adapter for handlers that return synchronously.
///
/// The function runs when the returned future is first polled, so a panic in
/// it is caught like a panic in an async handler.
#[derive(Debug, Clone)]
pub struct SyncHandler<F> {
    function: F,
}

impl<F> SyncHandler<F> {
    /// Wrap a synchronous handler function.
    pub fn new(function: F) -> Self {
        Self { function }
    }
}

impl<F, Out> Handler for SyncHandler<F>
where
    F: Fn(Value, Context, Callback) -> Out + Send + Sync + 'static,
    Out: IntoOutcome,
{
    type Output = Out;

    fn call(
        &self,
        event: Value,
        context: Context,
        callback: Callback,
    ) -> impl Future<Output = Self::Output> + Send {
        async move { (self.function)(event, context, callback) }
    }
}
