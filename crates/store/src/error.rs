use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the document store and vocabulary loader.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id in memory or on disk.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Input rejected: unknown type label, bad offsets, dangling relation endpoint...
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document with this id already exists.
    #[error("Document already exists: {0}")]
    Conflict(String),

    /// The vocabulary artifact is missing or malformed.
    #[error("Invalid vocabulary {path}: {reason}")]
    Vocabulary { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted document file could not be read back.
    #[error("Corrupt document file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Coarse classification used by callers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Internal,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DocumentNotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Vocabulary { .. }
            | Self::Io { .. }
            | Self::Corrupt { .. }
            | Self::Serialize(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(id: &str) -> Self {
        Self::DocumentNotFound(id.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
