//! Error types for log pool operations.
//!
//! Uses thiserror for derive macros. Every variant maps to a CLI exit code,
//! and callers that poll for a pool can test for contention specifically via
//! [`PoolError::is_contention`] or [`PoolError::kind`].

use crate::exit_codes;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for pool operations.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Another live handle holds the pool's lock claim.
    #[error("pool '{}' is locked by another handle", .path.display())]
    Contention { path: PathBuf },

    /// The pool file does not exist.
    #[error("pool '{}' does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// A file already exists where a new pool was to be created.
    #[error("pool '{}' already exists", .path.display())]
    AlreadyExists { path: PathBuf },

    /// The file exists but does not hold a valid pool header.
    #[error("'{}' is not a valid log pool: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    /// The caller passed an unusable argument (e.g. a pool size below the minimum).
    #[error("{0}")]
    InvalidArgument(String),

    /// The host environment failed an I/O operation.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl PoolError {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        PoolError::Io {
            context: context.into(),
            source,
        }
    }

    /// Classify an I/O error raised while opening, creating, or locking `path`.
    ///
    /// The host's "would block" signal becomes [`PoolError::Contention`];
    /// missing and pre-existing files get their own variants.
    pub fn from_io(path: &Path, context: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::WouldBlock => PoolError::Contention {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => PoolError::NotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::AlreadyExists => PoolError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => PoolError::io(format!("{} '{}'", context, path.display()), source),
        }
    }

    pub(crate) fn invalid_format(path: &Path, reason: impl Into<String>) -> Self {
        PoolError::InvalidFormat {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the pool is held by another live handle.
    pub fn is_contention(&self) -> bool {
        matches!(self, PoolError::Contention { .. })
    }

    /// The closest `std::io::ErrorKind` for this error.
    ///
    /// Contention reports `WouldBlock`, matching the host's lock signal.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            PoolError::Contention { .. } => io::ErrorKind::WouldBlock,
            PoolError::NotFound { .. } => io::ErrorKind::NotFound,
            PoolError::AlreadyExists { .. } => io::ErrorKind::AlreadyExists,
            PoolError::InvalidFormat { .. } => io::ErrorKind::InvalidData,
            PoolError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            PoolError::Io { source, .. } => source.kind(),
        }
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PoolError::Contention { .. } => exit_codes::CONTENTION,
            PoolError::NotFound { .. } => exit_codes::USER_ERROR,
            PoolError::AlreadyExists { .. } => exit_codes::USER_ERROR,
            PoolError::InvalidArgument(_) => exit_codes::USER_ERROR,
            PoolError::InvalidFormat { .. } => exit_codes::FORMAT_FAILURE,
            PoolError::Io { .. } => exit_codes::IO_FAILURE,
        }
    }
}

/// Result type alias for pool operations.
pub type Result<T> = std::result::Result<T, PoolError>;
