//! Error kinds and constructors.
//!
//! Library operations return [`DiagramError`], which names the failure kinds
//! a caller can act on. The command layer works with [`AppResult`] and the
//! constructors below; every `DiagramError` converts into an [`AppError`] so
//! `?` works across the boundary.

use std::io;

pub use masterror::{AppError, AppResult};
use thiserror::Error;

/// Hard failures of schema scanning and diagram generation.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The file is missing, corrupt, or not a SQLite database.
    #[error("Database '{path}' is unreadable: {source}")]
    DatabaseUnreadable {
        path:   String,
        #[source]
        source: rusqlite::Error
    },
    /// The graph-rendering engine could not be started.
    #[error("Render engine '{engine}' is unavailable: {source}")]
    RenderEngineUnavailable {
        engine: String,
        #[source]
        source: io::Error
    },
    /// The engine ran but did not produce an image.
    #[error("Render engine '{engine}' failed ({status}): {stderr}")]
    RenderFailed {
        engine: String,
        status: String,
        stderr: String
    },
    /// Reading or writing a stored artifact failed.
    #[error("Storage error at '{path}': {source}")]
    Storage {
        path:   String,
        #[source]
        source: io::Error
    }
}

impl DiagramError {
    pub fn database_unreadable(path: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::DatabaseUnreadable {
            path: path.into(),
            source
        }
    }

    pub fn storage(path: impl Into<String>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source
        }
    }
}

impl From<DiagramError> for AppError {
    fn from(err: DiagramError) -> Self {
        match err {
            DiagramError::DatabaseUnreadable { .. } => AppError::bad_request(err.to_string()),
            DiagramError::RenderEngineUnavailable { .. } | DiagramError::RenderFailed { .. } => {
                AppError::service(err.to_string())
            }
            DiagramError::Storage { .. } => AppError::internal(err.to_string())
        }
    }
}

/// Create file write error
pub fn file_write_error(path: &str, source: io::Error) -> AppError {
    AppError::internal(format!("Failed to write file '{}': {}", path, source))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}
