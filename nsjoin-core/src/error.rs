//! Error types for nsjoin

use thiserror::Error;

/// Nsjoin error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Namespace operation failed
    #[error("Namespace error: {message}")]
    Namespace {
        /// Error message
        message: String,
    },

    /// Security label resolution or transition failed
    #[error("Label error: {message}")]
    Label {
        /// Error message
        message: String,
    },

    /// Process management (fork/wait) failed
    #[error("Process error: {message}")]
    Process {
        /// Error message
        message: String,
    },

    /// Remounting a pseudo-filesystem failed
    #[error("Mount error: {message}")]
    Mount {
        /// Error message
        message: String,
    },

    /// Replacing the process image failed
    #[error("Exec error: {message}")]
    Exec {
        /// Error message
        message: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// Operation that was denied
        operation: String,
    },

    /// System error from nix
    #[error("System error: {0}")]
    System(#[from] nix::Error),
}

impl Error {
    /// Map this error to a process exit status.
    ///
    /// Failures inside a forked helper cannot cross the fork boundary as
    /// error values, so each category gets a stable small integer that the
    /// helper exits with and the parent forwards verbatim.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig { .. } => 2,
            Self::Namespace { .. } => 3,
            Self::Label { .. } => 4,
            Self::Process { .. } => 5,
            Self::Mount { .. } => 6,
            Self::Exec { .. } => 7,
            _ => 1,
        }
    }
}

/// Result type alias for nsjoin operations
pub type Result<T> = std::result::Result<T, Error>;
