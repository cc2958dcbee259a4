//! Error taxonomy for the virtual disk.
//!
//! Every failure is raised at the point of detection and is terminal for the
//! operation that produced it. There is no I/O to retry against.

use std::io;
use thiserror::Error;

/// Errors raised by the virtual disk engine.
#[derive(Debug, Error)]
pub enum DiskError {
    #[error("Could not find a part of the path '{0}'.")]
    DirectoryNotFound(String),

    #[error("Could not find file '{0}'.")]
    FileNotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Access to the path '{0}' is denied.")]
    Unauthorized(String),

    #[error("The directory '{0}' is not empty.")]
    NotEmpty(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A listed child has no live node. Never expected in correct operation.
    #[error("Node store is in a corrupted state: {0}")]
    Corrupted(String),

    #[error("Drive root '{0}' cannot be removed or moved")]
    RootRemoval(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stream I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DiskError {
    /// Corruption is the only fatal class; callers must not continue using the store.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiskError::Corrupted(_) | DiskError::RootRemoval(_))
    }

    pub fn kind(&self) -> io::ErrorKind {
        match self {
            DiskError::DirectoryNotFound(_) | DiskError::FileNotFound(_) => io::ErrorKind::NotFound,
            DiskError::AlreadyExists(_) => io::ErrorKind::AlreadyExists,
            DiskError::Unauthorized(_) => io::ErrorKind::PermissionDenied,
            DiskError::NotEmpty(_) => io::ErrorKind::DirectoryNotEmpty,
            DiskError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            DiskError::Io(e) => e.kind(),
            DiskError::Corrupted(_) | DiskError::RootRemoval(_) | DiskError::Config(_) => {
                io::ErrorKind::Other
            }
        }
    }

    pub(crate) fn corrupted(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!(detail = %msg, "node store corruption detected");
        DiskError::Corrupted(msg)
    }
}

impl From<DiskError> for io::Error {
    fn from(err: DiskError) -> Self {
        match err {
            DiskError::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}

impl From<config::ConfigError> for DiskError {
    fn from(err: config::ConfigError) -> Self {
        DiskError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DiskError>;
