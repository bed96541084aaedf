//! Query execution - parallel per-file processing.
//!
//! The file list is collected first (the walk is a single-threaded
//! iterator), then files are read, matched and committed on a rayon pool.

use std::collections::HashSet;
use std::fs;
use std::time::Instant;

use omni_io::read_text_safe;
use rayon::prelude::*;

use crate::assemble::{FileOutcome, ResponseAssembler};
use crate::commit::CommitWriter;
use crate::diff::diff_file;
use crate::error::RewriteError;
use crate::scan::{Candidate, Scanner};
use crate::types::{Query, QueryConfig, QueryResult, RunStats};
use crate::validate::{ValidatedQuery, validate_query};

/// Runs rewrite queries against the filesystem.
///
/// Holds no per-query state; one engine can serve concurrent queries.
///
/// # Example
///
/// ```rust,ignore
/// use omni_rewrite::{Query, QueryConfig, RewriteEngine};
///
/// let engine = RewriteEngine::new(QueryConfig::default())?;
/// let result = engine.run(&Query {
///     directory: "src".into(),
///     file_suffixes: vec![".rs".into()],
///     match_content: r"(\w+)\.unwrap\(\)".into(),
///     replace_content: "${1}?".into(),
///     commit: false,
/// });
/// ```
pub struct RewriteEngine {
    config: QueryConfig,
    pool: Option<rayon::ThreadPool>,
}

impl RewriteEngine {
    /// Create an engine; a dedicated pool is built when `workers > 0`.
    ///
    /// # Errors
    /// `RewriteError::WorkerPool` when the pool cannot be created.
    pub fn new(config: QueryConfig) -> Result<Self, RewriteError> {
        let pool = if config.workers > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .thread_name(|i| format!("omni-rewrite-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { config, pool })
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Run `query` and return the response payload.
    #[must_use]
    pub fn run(&self, query: &Query) -> QueryResult {
        self.run_with_stats(query).0
    }

    /// Run `query`, returning the payload and run counters.
    #[must_use]
    pub fn run_with_stats(&self, query: &Query) -> (QueryResult, RunStats) {
        let started = Instant::now();
        let deadline = self.config.timeout.map(|t| started + t);

        let validated = match validate_query(query, &self.config) {
            Ok(v) => v,
            Err(error) => {
                tracing::info!(error = %error, "query rejected");
                return (ResponseAssembler::rejected(&error), RunStats::default());
            }
        };

        if let Err(e) = fs::read_dir(&validated.root) {
            let error = RewriteError::Scan {
                path: validated.root.display().to_string(),
                reason: e.to_string(),
            };
            tracing::warn!(error = %error, "query root unreadable");
            return (ResponseAssembler::rejected(&error), RunStats::default());
        }

        let scanner = Scanner::new(validated.root.clone(), validated.suffixes.clone())
            .follow_symlinks(self.config.follow_symlinks)
            .max_depth(self.config.max_depth);

        let mut assembler = ResponseAssembler::new();
        let mut candidates = Vec::new();
        let mut cut_short = false;
        for item in scanner.iter() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                cut_short = true;
                break;
            }
            match item {
                Ok(candidate) => candidates.push(candidate),
                Err(error) => assembler.record_scan_error(&error),
            }
        }

        if self.config.follow_symlinks {
            candidates = dedupe_by_target(candidates);
        }

        tracing::debug!(
            root = %validated.root.display(),
            candidates = candidates.len(),
            commit = validated.commit,
            "scan complete"
        );

        let outcomes: Vec<FileOutcome> = self.install(|| {
            candidates
                .par_iter()
                .map(|candidate| self.process(candidate, &validated, deadline))
                .collect()
        });

        for outcome in outcomes {
            cut_short |= matches!(outcome, FileOutcome::Expired);
            assembler.record(outcome);
        }
        if cut_short && let Some(timeout) = self.config.timeout {
            assembler.record_timeout(timeout);
        }

        let (result, stats) = assembler.finish();
        tracing::info!(
            root = %validated.root.display(),
            commit = validated.commit,
            files_scanned = stats.files_scanned,
            files_changed = stats.files_changed,
            lines_changed = stats.lines_changed,
            files_skipped = stats.files_skipped,
            files_committed = stats.files_committed,
            commit_failures = stats.commit_failures,
            scan_errors = stats.scan_errors,
            elapsed_ms = started.elapsed().as_millis(),
            "query finished"
        );
        (result, stats)
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn process(
        &self,
        candidate: &Candidate,
        query: &ValidatedQuery,
        deadline: Option<Instant>,
    ) -> FileOutcome {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return FileOutcome::Expired;
        }

        let content = match read_text_safe(&candidate.path, self.config.max_file_size) {
            Ok(content) => content,
            Err(source) => {
                return FileOutcome::Skipped(RewriteError::FileRead {
                    path: candidate.relative.clone(),
                    source,
                });
            }
        };

        let diff = diff_file(candidate.relative.clone(), &content, &query.rewriter);
        if !query.commit {
            return FileOutcome::Scanned {
                diff,
                committed: false,
            };
        }

        match CommitWriter::commit(&candidate.path, &content, &diff) {
            Ok(committed) => FileOutcome::Scanned { diff, committed },
            Err(error) => FileOutcome::CommitFailed { diff, error },
        }
    }
}

/// Keep only the first-discovered path for each underlying file.
///
/// With links followed, one file can be reached under several paths; reading
/// and committing each alias would apply the rewrite more than once.
fn dedupe_by_target(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|candidate| {
            let target = fs::canonicalize(&candidate.path).unwrap_or_else(|_| candidate.path.clone());
            let first = seen.insert(target);
            if !first {
                tracing::debug!(path = %candidate.relative, "skipping alias of an earlier file");
            }
            first
        })
        .collect()
}
