//! Error types for the tap-to-trip engine.

use crate::tap::Stop;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur during engine operation.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open, read or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reading or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A completed trip's stop pair has no configured fare
    #[error("No fare defined for route between {from} and {to}")]
    RouteNotFound { from: Stop, to: Stop },

    /// The same unordered stop pair was configured more than once
    #[error("Conflicting fare entries for route between {a} and {b}")]
    ConfigurationConflict { a: Stop, b: Stop },

    /// Unusable row in a fare schedule
    #[error("Invalid fare at row {row}: {message}")]
    InvalidFare { row: usize, message: String },

    /// Unusable row in a taps file
    #[error("Invalid tap at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Input or output path escapes the working directory
    #[error("Path is outside the allowed working directory: {}", path.display())]
    PathOutsideWorkingDir { path: PathBuf },
}
