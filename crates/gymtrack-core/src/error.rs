//! Error types for gymtrack

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gymtrack
#[derive(Debug, Error)]
pub enum GymError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Key-value storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import payload has an unrecognized shape
    #[error("Invalid import format: {0}")]
    InvalidImport(String),

    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Exercise not found in the active session
    #[error("Exercise not found: {0}")]
    ExerciseNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<GymError>,
    },
}

impl GymError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        GymError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<toml::de::Error> for GymError {
    fn from(err: toml::de::Error) -> Self {
        GymError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for GymError {
    fn from(err: toml::ser::Error) -> Self {
        GymError::Toml(err.to_string())
    }
}

/// Result type alias for gymtrack
pub type Result<T> = std::result::Result<T, GymError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GymError::SessionNotFound("test-123".to_string());
        assert_eq!(err.to_string(), "Session not found: test-123");
    }

    #[test]
    fn test_invalid_import_display() {
        let err = GymError::InvalidImport("expected an array of sessions".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid import format: expected an array of sessions"
        );
    }

    #[test]
    fn test_error_with_context() {
        let err = GymError::Storage("disk full".to_string());
        let err = err.with_context("Failed to persist sessions");
        assert!(err.to_string().contains("Failed to persist sessions"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GymError = io_err.into();
        assert!(matches!(err, GymError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let err: GymError = toml_err.into();
        assert!(matches!(err, GymError::Toml(_)));
    }
}
