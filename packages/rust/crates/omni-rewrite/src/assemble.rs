//! Response assembly.
//!
//! Policy:
//! - a rejected request carries only `Error`;
//! - unreadable files and untraversable subtrees are left out of `Files`;
//! - commit failures keep their file in `Files` and are listed in `Error`;
//! - a timeout is appended to `Error` and partial `Files` are kept.

use std::time::Duration;

use crate::error::RewriteError;
use crate::types::{FileDiff, QueryResult, RunStats};

/// What happened to one candidate file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Read and matched; `committed` is true when it was written back.
    Scanned {
        /// Matching lines of the file.
        diff: FileDiff,
        /// Whether the rewrite was persisted.
        committed: bool,
    },
    /// Read and matched, but persisting the rewrite failed.
    CommitFailed {
        /// Matching lines of the file.
        diff: FileDiff,
        /// Why the write failed.
        error: RewriteError,
    },
    /// Could not be read as text.
    Skipped(RewriteError),
    /// The deadline passed before the file was started.
    Expired,
}

/// Collects file outcomes into a [`QueryResult`].
#[derive(Debug, Default)]
pub struct ResponseAssembler {
    files: Vec<FileDiff>,
    commit_failures: Vec<(String, String)>,
    timed_out: Option<Duration>,
    stats: RunStats,
}

impl ResponseAssembler {
    /// Create an empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for a query that failed as a whole.
    #[must_use]
    pub fn rejected(error: &RewriteError) -> QueryResult {
        QueryResult {
            error: error.to_string(),
            files: Vec::new(),
        }
    }

    /// Record a subtree that could not be traversed.
    pub fn record_scan_error(&mut self, error: &RewriteError) {
        tracing::warn!(error = %error, "skipping subtree");
        self.stats.scan_errors += 1;
    }

    /// Mark the run as cut short by its deadline.
    pub fn record_timeout(&mut self, after: Duration) {
        self.timed_out = Some(after);
    }

    /// Record one file outcome.
    pub fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Scanned { diff, committed } => {
                self.count_scanned(&diff);
                if committed {
                    self.stats.files_committed += 1;
                }
                self.files.push(diff);
            }
            FileOutcome::CommitFailed { diff, error } => {
                tracing::warn!(path = %diff.path, error = %error, "commit failed");
                self.count_scanned(&diff);
                self.stats.commit_failures += 1;
                let reason = match &error {
                    RewriteError::Commit { source, .. } => source.to_string(),
                    other => other.to_string(),
                };
                self.commit_failures.push((diff.path.clone(), reason));
                self.files.push(diff);
            }
            FileOutcome::Skipped(error) => {
                tracing::warn!(error = %error, "skipping file");
                self.stats.files_skipped += 1;
            }
            FileOutcome::Expired => {
                self.stats.files_skipped += 1;
            }
        }
    }

    fn count_scanned(&mut self, diff: &FileDiff) {
        self.stats.files_scanned += 1;
        let changed = diff.changed_lines();
        if changed > 0 {
            self.stats.files_changed += 1;
            self.stats.lines_changed += changed;
        }
    }

    /// Produce the response and the run counters.
    #[must_use]
    pub fn finish(mut self) -> (QueryResult, RunStats) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
        self.commit_failures.sort();

        let mut errors = Vec::new();
        if !self.commit_failures.is_empty() {
            let detail = self
                .commit_failures
                .iter()
                .map(|(path, reason)| format!("{path}: {reason}"))
                .collect::<Vec<_>>()
                .join("; ");
            errors.push(format!(
                "commit failed for {} file(s): {detail}",
                self.commit_failures.len()
            ));
        }
        if let Some(after) = self.timed_out {
            errors.push(RewriteError::Timeout(after).to_string());
        }

        let result = QueryResult {
            error: errors.join("; "),
            files: self.files,
        };
        (result, self.stats)
    }
}
