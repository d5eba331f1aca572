//! Error types for the IntelliRAG client.
//!
//! This module defines a unified error enum covering configuration, I/O,
//! transport, backend API and serialization failures.

use thiserror::Error;

/// Unified error type for the IntelliRAG client.
///
/// All fallible functions return `Result<T, AppError>`. Citation tokenizing
/// is total and never produces one of these.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend could not be reached (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Input rejected before any request was sent
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// HTTP status attached to the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = AppError::Api {
            status: 400,
            message: "Only PDF files are supported.".to_string(),
        };
        assert_eq!(err.to_string(), "Only PDF files are supported.");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, AppError::Serialization(_)));
        assert_eq!(err.status(), None);
    }
}
