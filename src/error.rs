use std::io;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for filesystem-touching operations.
pub type FsResult<T> = std::result::Result<T, FsError>;

/// Fatal application errors (startup, terminal, event stream).
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or startup operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A filesystem failure that could not be handled locally.
    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),
}

/// Recoverable filesystem failures, reported as status text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found")]
    NotFound,

    #[error("Already exists")]
    AlreadyExists,

    /// Name contains a path separator, is empty, or is `.`/`..`.
    #[error("Invalid name")]
    InvalidName,

    #[error("Not a directory")]
    NotADirectory,

    #[error("{0}")]
    Other(String),
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
            io::ErrorKind::NotFound => FsError::NotFound,
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists,
            _ => FsError::Other(err.to_string()),
        }
    }
}
