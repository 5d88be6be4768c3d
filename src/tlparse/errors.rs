//! # Trace-Log Aggregation Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for trace-log aggregation
pub type TlparseResult<T> = Result<T, TlparseError>;

#[derive(Debug, Error)]
pub enum TlparseError {
    #[error("Cannot read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
