//! Error types for Storyflow.
//!
//! All errors in Storyflow are represented by the `StoryflowError` enum,
//! which provides specific variants for different error categories.
//!
//! Authoring mistakes in a story graph (a direct node with two outgoing edges,
//! a condition node without a default branch) are *not* errors: they surface as
//! dead ends during traversal. Errors are reserved for malformed input and misuse
//! of the session API.

use std::io::ErrorKind;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Storyflow operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum StoryflowError {
    /// Configuration parsing or validation errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Document structure errors (missing start node, bad shape).
    #[error("{0}")]
    Document(String),

    /// Node definition errors.
    #[error("{0}")]
    Node(String),

    /// Edge definition errors.
    #[error("{0}")]
    Edge(String),

    /// Variable declaration or lookup errors.
    #[error("{0}")]
    Variable(String),

    /// Arithmetic expression errors.
    #[error("{0}")]
    Expression(String),

    /// Preview session misuse (choosing on a terminal node, unknown choice).
    #[error("{0}")]
    Session(String),

    /// Storage operation errors.
    #[error("{0}")]
    Store(String),

    /// I/O operation errors.
    #[error("{0}")]
    IoError(String),
}

impl From<std::io::Error> for StoryflowError {
    fn from(error: std::io::Error) -> Self {
        StoryflowError::IoError(error.to_string())
    }
}

impl From<StoryflowError> for std::io::Error {
    fn from(val: StoryflowError) -> Self {
        #[allow(clippy::io_other_error)]
        std::io::Error::new(ErrorKind::Other, val.to_string())
    }
}

impl From<serde_json::Error> for StoryflowError {
    fn from(error: serde_json::Error) -> Self {
        StoryflowError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for StoryflowError {
    fn from(error: toml::de::Error) -> Self {
        StoryflowError::Config(error.to_string())
    }
}

impl From<jsonschema::ValidationError<'_>> for StoryflowError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        StoryflowError::Document(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_roundtrip_keeps_message() {
        let err = StoryflowError::from(std::io::Error::new(ErrorKind::NotFound, "missing save"));
        assert_eq!(err, StoryflowError::IoError("missing save".to_string()));

        let io: std::io::Error = StoryflowError::Store("disk full".to_string()).into();
        assert_eq!(io.to_string(), "disk full");
    }

    #[test]
    fn test_json_error_is_convert() {
        let err: StoryflowError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, StoryflowError::Convert(_)));
    }
}
