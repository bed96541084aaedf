//! Core types for rewrite queries.
//!
//! The wire shapes (`Query`, `QueryResult` and friends) use PascalCase field
//! names so the browser form can post and read them unchanged.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Incoming rewrite request, as posted to `/query`.
///
/// Missing fields deserialize to their empty value; [`crate::validate_query`]
/// decides what is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Query {
    /// Root directory; relative paths resolve against the data root.
    pub directory: String,
    /// File name endings to scan (empty = every file).
    pub file_suffixes: Vec<String>,
    /// Regular expression tested against each line.
    pub match_content: String,
    /// Replacement; `$1` / `${name}` expand capture groups.
    pub replace_content: String,
    /// Persist the rewrites instead of previewing them.
    pub commit: bool,
}

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LineDiff {
    /// Zero-based line index within the file.
    pub line: usize,
    /// Original line content, without its terminator.
    pub text: String,
    /// New content; `None` when the substitution left the line as it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten: Option<String>,
}

/// Matching lines of one scanned file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileDiff {
    /// Path relative to the query directory, `/`-separated.
    pub path: String,
    /// Matching lines in ascending order.
    #[serde(default)]
    pub lines: Vec<LineDiff>,
}

impl FileDiff {
    /// Whether at least one line would change.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.rewritten.is_some())
    }

    /// Number of lines whose content changes.
    #[must_use]
    pub fn changed_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.rewritten.is_some()).count()
    }
}

/// Response body of `/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult {
    /// Query-level failure message; empty on success.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Scanned files in path order.
    #[serde(default)]
    pub files: Vec<FileDiff>,
}

impl QueryResult {
    /// Whether the query completed without any reported error.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_empty()
    }
}

/// How many matches within a single line are substituted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplaceMode {
    /// Every non-overlapping match in the line.
    #[default]
    All,
    /// Only the leftmost match.
    First,
}

impl FromStr for ReplaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "first" => Ok(Self::First),
            other => Err(format!("unknown replace mode `{other}` (expected `all` or `first`)")),
        }
    }
}

impl fmt::Display for ReplaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::First => "first",
        })
    }
}

/// Engine configuration shared by every query.
///
/// Controls where relative directories resolve, how long a query may run and
/// how much work runs in parallel.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Base for relative `Directory` values.
    pub data_root: PathBuf,
    /// Per-query deadline (None = unbounded).
    pub timeout: Option<Duration>,
    /// Number of parallel workers (0 = rayon default).
    pub workers: usize,
    /// Maximum file size in bytes; larger files are skipped.
    pub max_file_size: u64,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: bool,
    /// Maximum directory depth below the root.
    pub max_depth: usize,
    /// Substitution policy within a line.
    pub replace_mode: ReplaceMode,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("."),
            timeout: Some(Duration::from_secs(30)),
            workers: 0,
            max_file_size: 1_048_576,
            follow_symlinks: false,
            max_depth: 64,
            replace_mode: ReplaceMode::All,
        }
    }
}

/// Counters for one query run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Files read and matched.
    pub files_scanned: usize,
    /// Files with at least one changed line.
    pub files_changed: usize,
    /// Total changed lines across all files.
    pub lines_changed: usize,
    /// Files left out (unreadable, binary, too large, not started).
    pub files_skipped: usize,
    /// Files persisted to disk.
    pub files_committed: usize,
    /// Files whose commit failed.
    pub commit_failures: usize,
    /// Subtrees that could not be traversed.
    pub scan_errors: usize,
}
