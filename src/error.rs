//! Error types for `phaselight`
//!
//! The core never fails in normal operation: values are handed off or the
//! caller blocks. What remains is resource exhaustion (thread creation,
//! allocation) plus the configuration and I/O errors of the command line
//! driver.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `phaselight` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Cycler error (spawn failure, double start)
    pub const PHASE_ERROR: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `phaselight` operations.
#[derive(Debug, Error)]
pub enum PhaselightError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Phase cycler error
    #[error(transparent)]
    Phase(#[from] PhaseError),

    /// Channel error
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PhaselightError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Phase(_) => ExitCode::PHASE_ERROR,
            Self::Channel(_) => ExitCode::ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },

    /// Referenced configuration file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Cycler Errors
// ============================================================================

/// Errors from starting or stopping a [`PhaseCycler`](crate::phase::PhaseCycler).
#[derive(Debug, Error)]
pub enum PhaseError {
    /// `start` was called on a cycler whose background task already runs
    #[error("phase cycler already started")]
    AlreadyStarted,

    /// The OS refused to create the background thread
    #[error("failed to spawn cycle thread: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// The background thread panicked before it could be joined
    #[error("cycle thread panicked")]
    TaskPanicked,
}

// ============================================================================
// Channel Errors
// ============================================================================

/// Errors from [`BlockingChannel`](crate::channel::BlockingChannel).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The pending sequence could not grow to hold another value
    #[error("channel capacity exhausted")]
    CapacityExhausted,
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `phaselight` operations.
pub type Result<T> = std::result::Result<T, PhaselightError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::PHASE_ERROR, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
        assert_eq!(ExitCode::INTERRUPTED, 130);
        assert_eq!(ExitCode::TERMINATED, 143);
    }

    #[test]
    fn test_phase_error_exit_code() {
        let err: PhaselightError = PhaseError::AlreadyStarted.into();
        assert_eq!(err.exit_code(), ExitCode::PHASE_ERROR);
    }

    #[test]
    fn test_channel_error_exit_code() {
        let err: PhaselightError = ChannelError::CapacityExhausted.into();
        assert_eq!(err.exit_code(), ExitCode::ERROR);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: PhaselightError = ConfigError::MissingFile {
            path: PathBuf::from("/test"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: PhaselightError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_spawn_failed_display_includes_source() {
        let err = PhaseError::SpawnFailed(std::io::Error::other("no threads left"));
        assert!(err.to_string().contains("no threads left"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "min_dwell".to_string(),
            value: "0ms".to_string(),
            expected: "a non-zero duration".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("min_dwell"));
        assert!(msg.contains("0ms"));
        assert!(msg.contains("non-zero"));
    }
}
