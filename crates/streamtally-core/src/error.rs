//! Error types for the streamtally core.

use thiserror::Error;

/// Errors raised while decoding or validating a wire tuple.
///
/// A tuple that fails decoding performs no cache mutation; the caller sees
/// the error before any store access happens.
#[derive(Debug, Error)]
pub enum TupleError {
    /// Wrong arity, or a field that is structurally missing or unparsable.
    #[error("invalid tuple shape: {0}")]
    InvalidShape(String),

    /// A field held a value of the wrong type (e.g. non-numeric delta).
    #[error("invalid value for {field}: {found}")]
    InvalidValueType {
        field: &'static str,
        found: String,
    },
}

impl TupleError {
    /// Shorthand for an arity mismatch.
    pub fn arity(got: usize) -> Self {
        TupleError::InvalidShape(format!("expected 4 elements, got {}", got))
    }
}
