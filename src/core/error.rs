//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`SvnNavigatorError`] which provides comprehensive error handling
//! for all svn-navigator operations. It uses `thiserror` for ergonomic error definitions
//! and includes specialized error constructors for common failure scenarios.
//!
//! # Public API
//! - [`SvnNavigatorError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, SvnNavigatorError>`
//!
//! # Error Categories
//! - **Client errors**: svn executable not found, non-zero exits, output parsing
//! - **Engine errors**: cancelled work units, unknown operation ids
//! - **File operations**: I/O errors, UTF-8 issues
//! - **Configuration**: config directory resolution, serialization

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for svn-navigator
#[derive(Error, Debug)]
pub enum SvnNavigatorError {
    // Working copy errors
    #[error("Not inside a Subversion working copy: {path}")]
    NotAWorkingCopy { path: PathBuf },

    // External client errors
    #[error("svn client failed: {message}")]
    ClientFailed { message: String },

    #[error("Failed to launch svn executable '{binary}': {source}")]
    ClientLaunchFailed {
        binary: String,
        source: std::io::Error,
    },

    #[error("Unparsable svn status line: {line:?}")]
    StatusParseFailed { line: String },

    #[error("Unknown status code: {code:?}")]
    UnknownStatusCode { code: char },

    #[error("Unknown resolution '{value}' (expected working, theirs-full, mine-full or base)")]
    UnknownResolution { value: String },

    // Engine errors
    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Unknown operation id: {id}")]
    UnknownOperation { id: uuid::Uuid },

    // Filesystem watcher errors
    #[error("Failed to watch path '{path}': {message}")]
    WatchFailed { path: PathBuf, message: String },

    // File operation errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 in svn output")]
    InvalidUtf8Output,

    // Configuration errors
    #[error("Could not find configuration directory")]
    ConfigDirectoryNotFound,

    #[error("Failed to write config file '{path}': {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // JSON serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using SvnNavigatorError
pub type Result<T> = std::result::Result<T, SvnNavigatorError>;

impl SvnNavigatorError {
    /// Create a client failure error carrying the raw message for user display
    pub fn client_failed(message: impl Into<String>) -> Self {
        Self::ClientFailed {
            message: message.into(),
        }
    }

    /// Create a client launch failure error
    pub fn client_launch_failed(binary: impl Into<String>, source: std::io::Error) -> Self {
        Self::ClientLaunchFailed {
            binary: binary.into(),
            source,
        }
    }

    /// Create a not-a-working-copy error
    pub fn not_a_working_copy(path: impl Into<PathBuf>) -> Self {
        Self::NotAWorkingCopy { path: path.into() }
    }

    /// Create a status parse error for an unrecognized output line
    pub fn status_parse_failed(line: impl Into<String>) -> Self {
        Self::StatusParseFailed { line: line.into() }
    }

    /// Create a watch failure error
    pub fn watch_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WatchFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config write failure error
    pub fn config_write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigWriteFailed {
            path: path.into(),
            source,
        }
    }

    /// True when the error represents cooperative cancellation rather than failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
