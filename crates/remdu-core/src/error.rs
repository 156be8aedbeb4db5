//! Error types for backend operations.

use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The path does not exist on the backend.
    #[error("not found: {path}")]
    NotFound { path: String },

    /// The backend refused access to the path.
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    /// A listing was requested for something that is not a directory.
    #[error("not a directory: {path}")]
    NotADirectory { path: String },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl BackendError {
    /// Create an I/O error with path context, classifying the common kinds.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}
