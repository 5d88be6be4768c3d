//! # Explain Errors

use thiserror::Error;

/// Result type for explain operations
pub type ExplainOutcome<T> = Result<T, ExplainError>;

/// Errors raised while reading a diagnostic or a stored result.
///
/// Malformed compile-time lines and missing optional fields are never
/// errors; they are skipped or treated as absent.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// A required diagnostic field is absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A required diagnostic field is present but unusable
    #[error("Invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    /// The JSON document could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored result violates a record invariant
    #[error("Invalid explain record: {0}")]
    InvalidRecord(String),
}

impl ExplainError {
    /// Build an `InvalidField` error
    pub fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        ExplainError::InvalidField {
            field,
            value: value.into(),
        }
    }
}
