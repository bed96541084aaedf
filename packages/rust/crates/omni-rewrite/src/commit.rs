//! Persisting rewritten files.
//!
//! Each file is written independently through [`omni_io::write_text_atomic`];
//! there is no cross-file transaction.

use std::path::Path;

use omni_io::write_text_atomic;

use crate::diff::apply_line_diffs;
use crate::error::RewriteError;
use crate::types::FileDiff;

/// Writes a file's rewritten content back to disk.
pub struct CommitWriter;

impl CommitWriter {
    /// Rebuild `original` with the rewrites in `diff` and replace `path`.
    ///
    /// Returns `Ok(false)` without touching the file when nothing changes.
    ///
    /// # Errors
    /// `RewriteError::Commit` when staging or renaming fails; the file on
    /// disk still holds `original` in that case.
    pub fn commit(path: &Path, original: &str, diff: &FileDiff) -> Result<bool, RewriteError> {
        if !diff.has_changes() {
            return Ok(false);
        }

        let content = apply_line_diffs(original, &diff.lines);
        write_text_atomic(path, &content).map_err(|source| RewriteError::Commit {
            path: diff.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %diff.path,
            lines = diff.changed_lines(),
            "committed rewrite"
        );
        Ok(true)
    }
}
