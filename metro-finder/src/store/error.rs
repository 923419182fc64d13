//! Facility store error types.

use std::io;
use std::path::PathBuf;

use crate::domain::ValidationError;

/// Errors from loading or saving JSON documents.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The file is not the expected JSON shape
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The document could not be serialized
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The file could not be written or replaced
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The loaded collection breaks a collection invariant
    #[error("invalid facility collection: {0}")]
    Invalid(#[from] ValidationError),
}
