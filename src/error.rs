// src/error.rs
//! Error types for the GPS decoder

use std::fmt;

pub type Result<T> = std::result::Result<T, GpsError>;

#[derive(Debug)]
pub enum GpsError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    Config(String),
    Other(String),
}

impl fmt::Display for GpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsError::Io(e) => write!(f, "IO error: {}", e),
            GpsError::Serial(e) => write!(f, "Serial error: {}", e),
            GpsError::Json(e) => write!(f, "JSON error: {}", e),
            GpsError::Connection(msg) => write!(f, "Connection error: {}", msg),
            GpsError::Config(msg) => write!(f, "Config error: {}", msg),
            GpsError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpsError::Io(e) => Some(e),
            GpsError::Serial(e) => Some(e),
            GpsError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GpsError {
    fn from(error: std::io::Error) -> Self {
        GpsError::Io(error)
    }
}

impl From<tokio_serial::Error> for GpsError {
    fn from(error: tokio_serial::Error) -> Self {
        GpsError::Serial(error)
    }
}

impl From<serde_json::Error> for GpsError {
    fn from(error: serde_json::Error) -> Self {
        GpsError::Json(error)
    }
}

impl From<anyhow::Error> for GpsError {
    fn from(error: anyhow::Error) -> Self {
        GpsError::Other(error.to_string())
    }
}

/// Why a single sentence was not committed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceError {
    /// Checksum missing, malformed or not matching the payload
    Checksum,
    /// Fewer comma-separated fields than the sentence grammar requires
    TooFewFields {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    /// A numeric field held something that is not a number
    InvalidField {
        kind: &'static str,
        index: usize,
        value: String,
    },
    /// Sentence type this decoder does not handle
    Unsupported(String),
}

impl fmt::Display for SentenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentenceError::Checksum => write!(f, "checksum mismatch"),
            SentenceError::TooFewFields { kind, expected, found } => write!(
                f,
                "{} sentence needs at least {} fields, got {}",
                kind, expected, found
            ),
            SentenceError::InvalidField { kind, index, value } => {
                write!(f, "{} field {} is not a number: {:?}", kind, index, value)
            }
            SentenceError::Unsupported(kind) => write!(f, "unsupported sentence type: {}", kind),
        }
    }
}

impl std::error::Error for SentenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_error_display() {
        let err = SentenceError::TooFewFields {
            kind: "GGA",
            expected: 13,
            found: 3,
        };
        assert_eq!(err.to_string(), "GGA sentence needs at least 13 fields, got 3");

        let err = SentenceError::Unsupported("GLL".to_string());
        assert_eq!(err.to_string(), "unsupported sentence type: GLL");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: GpsError = io.into();
        assert!(matches!(err, GpsError::Io(_)));
        assert!(err.to_string().starts_with("IO error"));
    }
}
