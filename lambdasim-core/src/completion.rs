//! Reconciliation of the three ways a handler can finish.
//!
//! A handler may call its [`Callback`], return, or fail (return an error or
//! panic). All of these feed one [`CompletionSlot`] through
//! [`CompletionSlot::reconcile`]:
//!
//! - each callback call replaces whatever an earlier call recorded;
//! - when the handler itself finishes, a recorded callback result wins and the
//!   handler's own value or error is dropped; otherwise the handler's outcome
//!   is taken;
//! - once the handler has finished the slot is sealed and later callback calls
//!   are ignored.

use crate::{
    error::FunctionError,
    outcome::{IntoOutcome, Outcome},
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// State of an invocation's result.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Nothing recorded yet.
    Pending,
    /// Finished with an optional body.
    Success(Option<Value>),
    /// Finished with a handler error.
    Failure(FunctionError),
}

impl From<Outcome> for Completion {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Ok(body) => Completion::Success(body),
            Err(error) => Completion::Failure(error),
        }
    }
}

impl IntoOutcome for Completion {
    fn into_outcome(self) -> Outcome {
        match self {
            Completion::Pending => Ok(None),
            Completion::Success(body) => Ok(body),
            Completion::Failure(error) => Err(error),
        }
    }
}

/// An input to [`CompletionSlot::reconcile`].
#[derive(Debug)]
pub enum Signal {
    /// The handler invoked its callback.
    Callback(Outcome),
    /// The handler's own future finished.
    Returned(Outcome),
}

/// Final result of an invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The outcome that becomes the response body.
    pub outcome: Outcome,
    /// A handler error dropped because the callback had already completed.
    pub discarded: Option<FunctionError>,
}

/// What [`CompletionSlot::reconcile`] did with a signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    /// A callback result was recorded, replacing any earlier one.
    Recorded,
    /// The slot was already sealed; the signal had no effect.
    Ignored,
    /// The handler finished and the slot is now sealed.
    Resolved(Resolution),
}

#[derive(Debug)]
struct SlotState {
    completion: Completion,
    sealed: bool,
}

/// Shared result slot of one invocation.
#[derive(Debug, Clone)]
pub struct CompletionSlot {
    state: Arc<Mutex<SlotState>>,
}

impl Default for CompletionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSlot {
    /// Create a pending slot.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState {
                completion: Completion::Pending,
                sealed: false,
            })),
        }
    }

    /// A callback writing into this slot.
    pub fn callback(&self) -> Callback {
        Callback { slot: self.clone() }
    }

    /// Snapshot of the current state.
    pub fn completion(&self) -> Completion {
        self.lock().completion.clone()
    }

    /// Whether the handler has finished.
    pub fn is_sealed(&self) -> bool {
        self.lock().sealed
    }

    /// Apply one signal. This is the only way the slot changes.
    pub fn reconcile(&self, signal: Signal) -> Reconciled {
        let mut state = self.lock();
        if state.sealed {
            return Reconciled::Ignored;
        }

        match signal {
            Signal::Callback(outcome) => {
                state.completion = outcome.into();
                Reconciled::Recorded
            }
            Signal::Returned(returned) => {
                state.sealed = true;
                let resolution = if matches!(state.completion, Completion::Pending) {
                    state.completion = returned.clone().into();
                    Resolution {
                        outcome: returned,
                        discarded: None,
                    }
                } else {
                    Resolution {
                        outcome: state.completion.clone().into_outcome(),
                        discarded: returned.err(),
                    }
                };
                Reconciled::Resolved(resolution)
            }
        }
    }

    /// Seal the slot with the handler's own outcome.
    ///
    /// Calling this on an already sealed slot returns the sealed result.
    pub fn resolve(&self, returned: Outcome) -> Resolution {
        match self.reconcile(Signal::Returned(returned)) {
            Reconciled::Resolved(resolution) => resolution,
            Reconciled::Recorded | Reconciled::Ignored => Resolution {
                outcome: self.completion().into_outcome(),
                discarded: None,
            },
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Completion callback handed to a handler.
///
/// Calling it more than once is allowed; the latest call wins. Calls made after
/// the handler has finished are ignored.
#[derive(Debug, Clone)]
pub struct Callback {
    slot: CompletionSlot,
}

impl Callback {
    /// Complete with any handler output, success or error.
    pub fn complete(&self, outcome: impl IntoOutcome) {
        if self.slot.reconcile(Signal::Callback(outcome.into_outcome())) == Reconciled::Ignored {
            tracing::warn!("callback invoked after the handler finished; ignoring");
        }
    }

    /// Complete successfully with `result` as the body.
    pub fn succeed(&self, result: impl IntoOutcome) {
        self.complete(result);
    }

    /// Complete with an error.
    pub fn fail(&self, error: impl Into<FunctionError>) {
        self.complete(Err::<(), FunctionError>(error.into()));
    }
}
