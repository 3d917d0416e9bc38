//! Error types for Drill operations.
//!
//! This module defines [`DrillError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `DrillError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `DrillError::Other`) for unexpected errors
//! - Only [`DrillError::DrbConnection`] is ever recovered from; match on it
//!   by variant, never with a catch-all

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Drill operations.
#[derive(Debug, Error)]
pub enum DrillError {
    /// No DRb server accepted the connection.
    #[error("Could not connect to DRb server at {address}: {message}")]
    DrbConnection { address: String, message: String },

    /// The DRb server sent something we could not understand.
    #[error("Invalid response from DRb server: {message}")]
    DrbProtocol { message: String },

    /// A flag the option parser declares but rejects.
    #[error("invalid option: {flag}\n\nPlease use --help for a listing of valid options")]
    InvalidOption { flag: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// External command could not be started or was killed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Bisection was requested but no coordinator command is configured.
    #[error("Bisect is unavailable: {message}")]
    BisectUnavailable { message: String },

    /// A collaborator ended up somewhere it should never be.
    #[error("Unexpected state: {message}")]
    UnexpectedState { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Drill operations.
pub type Result<T> = std::result::Result<T, DrillError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn drb_connection_displays_address() {
        let err = DrillError::DrbConnection {
            address: "127.0.0.1:8989".into(),
            message: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:8989"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn drb_connection_has_no_source() {
        let err = DrillError::DrbConnection {
            address: "127.0.0.1:8989".into(),
            message: "connection refused".into(),
        };
        assert!(err.source().is_none());
    }

    #[test]
    fn invalid_option_points_at_help() {
        let err = DrillError::InvalidOption { flag: "-d".into() };
        let msg = err.to_string();
        assert!(msg.starts_with("invalid option: -d"));
        assert!(msg.contains("--help"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = DrillError::ConfigParseError {
            path: PathBuf::from("/project/.drill.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/project/.drill.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = DrillError::CommandFailed {
            command: "cargo test".into(),
            code: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("cargo test"));
        assert!(msg.contains("None"));
    }

    #[test]
    fn unexpected_state_has_no_source() {
        let err = DrillError::UnexpectedState {
            message: "boom".into(),
        };
        assert!(err.source().is_none());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DrillError = io_err.into();
        assert!(matches!(err, DrillError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(DrillError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
