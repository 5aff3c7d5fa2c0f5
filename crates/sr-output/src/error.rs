//! Error types for sr-output.

use thiserror::Error;

/// Errors that can occur when writing simulation or search output.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("series {key} has {len} values, expected {expected}")]
    Ragged {
        key:      String,
        len:      usize,
        expected: usize,
    },
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
