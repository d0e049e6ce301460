//! Error types for audiogram loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for audiogram validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// E001: Top-level layout is neither `[left, right]` nor `{left, right}`
    InvalidLayout,
    /// E002: An ear entry is not a list of points
    InvalidEar,
    /// E003: A point is not a `[frequency, loss]` pair
    InvalidPoint,
    /// E004: A point value is not a number
    NonNumericValue,
    /// E005: A point value is NaN or infinite
    NonFiniteValue,
    /// E006: Negative frequency
    NegativeFrequency,
    /// E007: Not enough points to fit a cubic curve
    TooFewPoints,
    /// E008: Two points share the same frequency
    DuplicateFrequency,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidLayout => "E001",
            ErrorCode::InvalidEar => "E002",
            ErrorCode::InvalidPoint => "E003",
            ErrorCode::NonNumericValue => "E004",
            ErrorCode::NonFiniteValue => "E005",
            ErrorCode::NegativeFrequency => "E006",
            ErrorCode::TooFewPoints => "E007",
            ErrorCode::DuplicateFrequency => "E008",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic value (e.g., "\[0\]\[2\]\[1\]").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for audiogram operations.
pub type SpecResult<T> = Result<T, AudiogramError>;

/// Errors that can occur while loading an audiogram.
#[derive(Debug, Error)]
pub enum AudiogramError {
    /// The audiogram file could not be read.
    #[error("failed to read audiogram '{path}': {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The audiogram is not valid JSON.
    #[error("audiogram is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The audiogram parsed but failed validation.
    #[error("audiogram has {} error(s): {}", .0.len(), join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

impl AudiogramError {
    /// Returns the validation errors, if this is a validation failure.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            AudiogramError::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_path() {
        let err = ValidationError::with_path(ErrorCode::NegativeFrequency, "frequency is -5", "[0][1][0]");
        assert_eq!(err.to_string(), "E006: frequency is -5 (at [0][1][0])");
    }

    #[test]
    fn test_invalid_lists_every_error() {
        let err = AudiogramError::Invalid(vec![
            ValidationError::new(ErrorCode::TooFewPoints, "left ear has 1 point"),
            ValidationError::new(ErrorCode::TooFewPoints, "right ear has 0 points"),
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("audiogram has 2 error(s)"));
        assert!(msg.contains("left ear"));
        assert!(msg.contains("right ear"));
        assert_eq!(err.validation_errors().len(), 2);
    }
}
