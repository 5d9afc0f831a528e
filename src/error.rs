//! Error types for shpfiles.
//!
//! Uses thiserror for derive macros. Each variant is one kind of failure the
//! locator set can surface, and each maps to a CLI exit code.

use crate::exit_codes;
use std::io;
use thiserror::Error;

/// Main error type for shpfiles operations.
#[derive(Error, Debug)]
pub enum ShpFilesError {
    /// The seed identifier does not end in any known component extension.
    #[error("invalid resource: {0}")]
    InvalidResource(String),

    /// A non-blocking acquisition found the group lock held elsewhere.
    #[error("lock is busy: {0}")]
    LockContention(String),

    /// The requested component has no identifier in this set.
    #[error("resource absent: {0}")]
    ResourceAbsent(String),

    /// A release call did not match any held locker record.
    #[error("lock mismatch: {0}")]
    LockMismatch(String),

    /// A local-only operation was invoked on a non-local set.
    #[error("operation requires a local dataset: {0}")]
    LocalityViolation(String),

    /// Configuration could not be read or failed validation.
    #[error("config error: {0}")]
    Config(String),

    /// An underlying read, write, open or lock call failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ShpFilesError {
    /// Wrap an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        ShpFilesError::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShpFilesError::InvalidResource(_) => exit_codes::USER_ERROR,
            ShpFilesError::LocalityViolation(_) => exit_codes::USER_ERROR,
            ShpFilesError::Config(_) => exit_codes::USER_ERROR,
            ShpFilesError::ResourceAbsent(_) => exit_codes::IO_FAILURE,
            ShpFilesError::Io { .. } => exit_codes::IO_FAILURE,
            ShpFilesError::LockContention(_) => exit_codes::LOCK_FAILURE,
            ShpFilesError::LockMismatch(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for shpfiles operations.
pub type Result<T> = std::result::Result<T, ShpFilesError>;
