//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for callgauge operations
#[derive(Debug, Error)]
pub enum Error {
    /// Payload decode errors (malformed export, missing table)
    #[error("Payload error: {message}")]
    Payload {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Wrapped JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapped I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn payload(message: impl Into<String>) -> Self {
        Error::Payload {
            message: message.into(),
            path: None,
        }
    }

    pub fn payload_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Payload {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}

/// Result type alias using the callgauge error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_error_formats_message() {
        let err = Error::payload("no table in response");
        assert_eq!(err.to_string(), "Payload error: no table in response");
    }

    #[test]
    fn json_errors_convert_transparently() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
