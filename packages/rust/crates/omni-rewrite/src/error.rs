//! Error types for rewrite queries.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use std::time::Duration;

use omni_io::IoError;
use thiserror::Error;

/// Error types for a rewrite query.
///
/// `InvalidRequest` and `Timeout` are query-level; the others are scoped to a
/// single file or subtree and never abort the rest of the run.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// Malformed query (missing directory, uncompilable pattern).
    ///
    /// The message is shown to the user verbatim.
    #[error("{0}")]
    InvalidRequest(String),

    /// A directory could not be traversed.
    #[error("cannot traverse {path}: {reason}")]
    Scan {
        /// Offending path, relative to the query root when possible.
        path: String,
        /// Human readable cause.
        reason: String,
    },

    /// A candidate file could not be read as text.
    #[error("cannot read {path}: {source}")]
    FileRead {
        /// File path relative to the query root.
        path: String,
        /// Underlying read failure.
        #[source]
        source: IoError,
    },

    /// Persisting a rewritten file failed; the original is untouched.
    #[error("{path}: {source}")]
    Commit {
        /// File path relative to the query root.
        path: String,
        /// Underlying write failure.
        #[source]
        source: IoError,
    },

    /// The query deadline passed before every file was processed.
    #[error("query timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The dedicated worker pool could not be created.
    #[error("worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl RewriteError {
    /// Shorthand for [`RewriteError::InvalidRequest`].
    pub(crate) fn invalid(message: &str) -> Self {
        Self::InvalidRequest(message.to_string())
    }
}
