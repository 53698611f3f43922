//! Error types for workspace operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the caller of a workspace operation.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The document could not be read, stat'ed or written.
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document was read but its header could not be parsed.
    #[error("cannot parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The document kept changing on disk while an edit was being prepared.
    #[error("{} changed on disk while it was being edited", .path.display())]
    Changed { path: PathBuf },

    /// Discovery could not produce any document list.
    #[error("workspace discovery failed: {0}")]
    Discovery(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl WorkspaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True if the underlying file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Errors from the live workspace index. Never escapes discovery.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("live index is not supported on this platform")]
    Unsupported,

    #[error("index connection failed: {0}")]
    Connect(#[source] std::io::Error),

    #[error("index did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("index closed the connection without answering")]
    Closed,

    #[error("malformed index response: {0}")]
    Protocol(String),

    #[error("index reported an error: {0}")]
    Remote(String),
}

pub type Result<T, E = WorkspaceError> = std::result::Result<T, E>;
