//! Error types for lazymemo.

use std::convert::Infallible;

use thiserror::Error;

/// Default result type for lazymemo.
pub type LazyMemoResult<T> = Result<T, LazyMemoError>;

/// Errors raised by constructors, presets and the CLI.
#[derive(Error, Debug)]
pub enum LazyMemoError {
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Result for input {0} does not fit in the output type")]
    Overflow(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration not found at: {0}")]
    ConfigNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "cli")]
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl LazyMemoError {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<Infallible> for LazyMemoError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

/// Error returned by [`Evaluator`](crate::memo::Evaluator).
///
/// `Validation` is raised before any recursion for rejected inputs and cyclic
/// requests. `Upstream` carries the recurrence's own error untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError<E> {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Recurrence failed: {0}")]
    Upstream(E),
}

impl<E> EvalError<E> {
    /// Wraps an error raised by a recurrence.
    pub fn upstream(err: E) -> Self {
        Self::Upstream(err)
    }

    /// Returns `true` for validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the recurrence error, if this is one.
    pub fn into_upstream(self) -> Option<E> {
        match self {
            Self::Upstream(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

impl From<EvalError<LazyMemoError>> for LazyMemoError {
    fn from(err: EvalError<LazyMemoError>) -> Self {
        match err {
            EvalError::Validation(msg) => LazyMemoError::Validation(msg),
            EvalError::Upstream(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_flattens_into_crate_error() {
        let err: LazyMemoError = EvalError::<LazyMemoError>::Validation("n < 0".into()).into();
        assert!(matches!(err, LazyMemoError::Validation(ref m) if m == "n < 0"));

        let err: LazyMemoError =
            EvalError::upstream(LazyMemoError::Overflow("187".into())).into();
        assert!(matches!(err, LazyMemoError::Overflow(ref n) if n == "187"));
    }

    #[test]
    fn test_into_upstream() {
        let err: EvalError<&str> = EvalError::upstream("boom");
        assert!(!err.is_validation());
        assert_eq!(err.into_upstream(), Some("boom"));

        let err: EvalError<&str> = EvalError::Validation("bad".into());
        assert!(err.is_validation());
        assert_eq!(err.into_upstream(), None);
    }
}
