//! Unified error handling for the cowtrends crate
//!
//! This module provides a single `Error` enum that consolidates the
//! domain-specific errors used across the crate, plus a small
//! classification scheme so callers can decide on a handling strategy
//! (retry at the edge, fail fast, etc.).
//!
//! The trending contract itself knows only two outcomes: a successful
//! (possibly empty) result, or [`StoreError::Unavailable`]. Everything
//! else here is ambient plumbing (config files, JSON seeds, I/O at the
//! CLI edge).

use std::io;
use thiserror::Error;

// Re-export the store error for convenience
pub use crate::store::StoreError;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Post store errors (connection failure, query failure, timeout)
    Store,
    /// Configuration and validation errors
    Config,
    /// Serialization errors (JSON seed files, TOML config)
    Serialization,
    /// I/O errors
    Io,
}

/// Unified error type for the cowtrends crate
#[derive(Error, Debug)]
pub enum Error {
    /// Post store errors
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("config error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if this error is recoverable (a retry at the caller may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Store(_) => true,
            Self::Io(_) => true,
            Self::Config(_) | Self::Json(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Store(_) => ErrorCategory::Store,
            Self::Config(_) => ErrorCategory::Config,
            Self::Json(_) => ErrorCategory::Serialization,
            Self::Io(_) => ErrorCategory::Io,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_category() {
        let err = Error::Store(StoreError::unavailable("connection refused"));
        assert_eq!(err.category(), ErrorCategory::Store);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("invalid bind address");
        assert_eq!(err.category(), ErrorCategory::Config);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::unavailable("timed out");
        let unified: Error = store_err.into();
        assert!(matches!(unified, Error::Store(_)));
    }

    #[test]
    fn test_json_error_category() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let unified: Error = json_err.into();
        assert_eq!(unified.category(), ErrorCategory::Serialization);
        assert!(!unified.is_recoverable());
    }
}
