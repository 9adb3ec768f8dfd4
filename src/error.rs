// src/error.rs

//! Unified error handling for the reading tracker.

use std::fmt;

use thiserror::Error;

use crate::models::{LifecycleState, Transition};

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed user input, e.g. an ISBN of the wrong length
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Lookup miss or unknown record
    #[error("Not found: {0}")]
    NotFound(String),

    /// ISBN already present in the database
    #[error("ISBN {0} already exists")]
    DuplicateKey(u64),

    /// A remote service answered with a failure
    #[error("Remote error for {context}: {message}")]
    Remote { context: String, message: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transition not offered in the record's current state
    #[error("Cannot {transition} a book that is {state}")]
    InvalidTransition {
        state: LifecycleState,
        transition: Transition,
    },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid-format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a remote failure with context.
    pub fn remote(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Remote {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came from a store or network call.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. } | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_are_classified() {
        assert!(AppError::remote("pages.update", "boom").is_remote());
        assert!(!AppError::invalid_format("bad isbn").is_remote());
        assert!(!AppError::DuplicateKey(1).is_remote());
    }

    #[test]
    fn invalid_transition_message() {
        let err = AppError::InvalidTransition {
            state: LifecycleState::Finished,
            transition: Transition::Start,
        };
        assert_eq!(err.to_string(), "Cannot start a book that is finished");
    }
}
