#![allow(clippy::doc_markdown)]

//! omni-rewrite - Line-oriented bulk regex rewriting
//!
//! Scans a directory tree, matches a regular expression line by line,
//! previews the substitutions and, on request, writes them back atomically.
//!
//! # Features
//!
//! - **Dry run by default**: `Commit = false` never touches the filesystem
//! - **Per-line diffs**: only matching lines are reported
//! - **Atomic commits**: each file is replaced via temp file + rename
//! - **Parallel**: files are processed on a rayon pool with a per-query deadline
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-rewrite/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # RewriteError enum (thiserror)
//! ├── types.rs     # Query, LineDiff, FileDiff, QueryResult, QueryConfig
//! ├── validate.rs  # Request validation
//! ├── scan.rs      # Directory traversal + suffix filter
//! ├── line.rs      # Line splitting and substitution
//! ├── diff.rs      # FileDiff construction, content rebuild, unified diff
//! ├── commit.rs    # Atomic write-back
//! ├── assemble.rs  # QueryResult assembly
//! └── engine.rs    # Parallel execution with rayon
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_rewrite::{Query, QueryConfig, RewriteEngine};
//!
//! let engine = RewriteEngine::new(QueryConfig::default())?;
//! let preview = engine.run(&Query {
//!     directory: "/project".into(),
//!     file_suffixes: vec![".py".into()],
//!     match_content: r"print\((.*)\)".into(),
//!     replace_content: "logger.info($1)".into(),
//!     commit: false,
//! });
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod assemble;
mod commit;
mod diff;
mod engine;
mod error;
mod line;
mod scan;
mod types;
mod validate;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use engine::RewriteEngine;
pub use error::RewriteError;
pub use types::{FileDiff, LineDiff, Query, QueryConfig, QueryResult, ReplaceMode, RunStats};

pub use assemble::{FileOutcome, ResponseAssembler};
pub use commit::CommitWriter;
pub use diff::{FileDiffBuilder, apply_line_diffs, diff_file, generate_unified_diff};
pub use line::{LineOutcome, LineRewriter, SourceLine, split_lines};
pub use scan::{Candidate, Scanner, SuffixFilter};
pub use validate::{ValidatedQuery, parse_suffixes, validate_query};
