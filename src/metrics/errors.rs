//! # Metrics Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors raised while flushing metrics
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to write metrics to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MetricsError {
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MetricsError::Write {
            path: path.into(),
            source,
        }
    }
}
