//! Error types for file I/O operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::path::PathBuf;

use thiserror::Error;

/// Error types for file I/O operations.
///
/// Each variant represents a specific failure mode in the read or write pipeline.
#[derive(Error, Debug)]
pub enum IoError {
    /// File does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// File exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// File contains binary content (NULL bytes detected).
    #[error("Binary file detected")]
    BinaryFile,

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),

    /// Content is not valid UTF-8.
    #[error("UTF-8 decoding error at byte {0}")]
    Encoding(usize),

    /// Target has no parent directory to stage a temporary file in.
    #[error("No parent directory for {0}")]
    NoParent(PathBuf),

    /// Renaming the staged temporary file over the target failed.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        /// File that was being replaced.
        path: PathBuf,
        /// Underlying rename failure.
        #[source]
        source: std::io::Error,
    },
}
