//! Core error types for breathloop-core.
//!
//! Session commands reject bad input with [`SessionError`] before touching any
//! state. Preference loading and saving report through [`ConfigError`], and
//! [`CoreError`] wraps both for callers that deal with either.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for breathloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session command validation errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections raised by the session command API.
///
/// Every variant is produced before any mutation, so a failed command leaves
/// the previous valid session untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Empty pattern, blank phase name or a zero-length phase
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// Single-phase edit with a duration below one second
    #[error("Invalid duration {duration}s for phase {index}: must be at least 1 second")]
    InvalidDuration { index: usize, duration: u32 },

    /// Phase edit addressed past the end of the pattern
    #[error("Phase index {index} out of range for pattern (length: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Cycle or set count below one
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// No preset with the given id
    #[error("Unknown pattern preset: {0}")]
    UnknownPreset(String),

    /// Home or config directory could not be resolved
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_render_context() {
        let err = SessionError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(
            err.to_string(),
            "Phase index 5 out of range for pattern (length: 3)"
        );

        let err = SessionError::InvalidDuration {
            index: 1,
            duration: 0,
        };
        assert!(err.to_string().contains("phase 1"));
    }

    #[test]
    fn session_error_converts_into_core_error() {
        let core: CoreError = SessionError::InvalidPattern("empty".into()).into();
        assert!(matches!(
            core,
            CoreError::Session(SessionError::InvalidPattern(_))
        ));
        assert_eq!(core.to_string(), "Session error: Invalid pattern: empty");
    }
}
