//! Conversion of handler output into an invocation outcome.

use crate::error::FunctionError;
use serde::Serialize;
use serde_json::Value;

/// What an invocation produced: a body (possibly absent) or a handler error.
pub type Outcome = Result<Option<Value>, FunctionError>;

/// Trait for converting a handler's output into an [`Outcome`].
///
/// # Default Implementations
///
/// - `()` → success with no body
/// - `Value` → success with that body
/// - `Option<T>` → `None` is success with no body
/// - `Result<T, E>` → delegates to `T` or converts `E` into a [`FunctionError`]
/// - [`Json<T>`] → serializes `T`
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a handler",
    label = "missing `IntoOutcome` implementation",
    note = "Return `()`, a `serde_json::Value`, `Json<T>`, or a `Result` of those."
)]
pub trait IntoOutcome {
    /// Convert into the invocation outcome.
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Ok(None)
    }
}

impl IntoOutcome for Value {
    fn into_outcome(self) -> Outcome {
        Ok(Some(self))
    }
}

impl<T: IntoOutcome> IntoOutcome for Option<T> {
    fn into_outcome(self) -> Outcome {
        match self {
            Some(inner) => inner.into_outcome(),
            None => Ok(None),
        }
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: IntoOutcome,
    E: Into<FunctionError>,
{
    fn into_outcome(self) -> Outcome {
        match self {
            Ok(inner) => inner.into_outcome(),
            Err(error) => Err(error.into()),
        }
    }
}

/// Wrapper returning any serializable value as the body.
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoOutcome for Json<T> {
    fn into_outcome(self) -> Outcome {
        serde_json::to_value(&self.0)
            .map(Some)
            .map_err(FunctionError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Greeting {
        text: &'static str,
    }

    #[test]
    fn test_unit_is_absent_body() {
        assert_eq!(().into_outcome(), Ok(None));
        assert_eq!(None::<Value>.into_outcome(), Ok(None));
    }

    #[test]
    fn test_value_and_json() {
        assert_eq!(json!({"a": 1}).into_outcome(), Ok(Some(json!({"a": 1}))));
        assert_eq!(
            Json(Greeting { text: "hi" }).into_outcome(),
            Ok(Some(json!({"text": "hi"})))
        );
    }

    #[test]
    fn test_result_error_converts() {
        let result: Result<Value, std::io::Error> = Err(std::io::Error::other("nope"));
        let error = result.into_outcome().unwrap_err();
        assert_eq!(error.message(), "nope");

        let result: Result<(), FunctionError> = Err(FunctionError::new("Custom", "x"));
        assert_eq!(result.into_outcome().unwrap_err().kind(), "Custom");
    }
}
