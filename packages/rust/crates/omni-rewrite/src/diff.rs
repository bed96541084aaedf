//! File-level diff construction.
//!
//! Aggregates per-line outcomes into a [`FileDiff`], rebuilds full file
//! content from a diff, and renders unified diffs with the `similar` crate.

use similar::TextDiff;

use crate::line::{LineOutcome, LineRewriter, SourceLine, split_lines};
use crate::types::{FileDiff, LineDiff};

/// Collects the matching lines of one file.
#[derive(Debug)]
pub struct FileDiffBuilder {
    path: String,
    lines: Vec<LineDiff>,
}

impl FileDiffBuilder {
    /// Start a diff for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            lines: Vec::new(),
        }
    }

    /// Record one line; unmatched lines are dropped.
    pub fn push(&mut self, line: &SourceLine<'_>, outcome: LineOutcome) {
        if let LineOutcome::Matched(rewritten) = outcome {
            self.lines.push(LineDiff {
                line: line.index,
                text: line.body.to_string(),
                rewritten,
            });
        }
    }

    /// Finish; a file without matches yields an empty line list.
    #[must_use]
    pub fn finish(self) -> FileDiff {
        FileDiff {
            path: self.path,
            lines: self.lines,
        }
    }
}

/// Match every line of `content` and build its diff.
pub fn diff_file(path: impl Into<String>, content: &str, rewriter: &LineRewriter) -> FileDiff {
    let mut builder = FileDiffBuilder::new(path);
    for (line, outcome) in rewriter.rewrite_lines(content) {
        builder.push(&line, outcome);
    }
    builder.finish()
}

/// Rebuild full content with the rewritten lines of `lines` applied.
///
/// Lines not listed, or listed without a rewrite, are copied verbatim along
/// with every terminator. `lines` must be in ascending line order.
#[must_use]
pub fn apply_line_diffs(original: &str, lines: &[LineDiff]) -> String {
    let mut output = String::with_capacity(original.len());
    let mut pending = lines.iter().filter(|l| l.rewritten.is_some()).peekable();

    for line in split_lines(original) {
        let replacement = pending
            .next_if(|l| l.line == line.index)
            .and_then(|l| l.rewritten.as_deref());
        output.push_str(replacement.unwrap_or(line.body));
        output.push_str(line.terminator);
    }

    output
}

/// Context lines around each hunk in [`generate_unified_diff`].
const CONTEXT_RADIUS: usize = 3;

/// Render `original` -> `modified` as a `git`-style unified diff for `path`.
///
/// Headers are `a/<path>` and `b/<path>`; hunks carry `@@` ranges. Identical
/// inputs render as an empty string.
#[must_use]
pub fn generate_unified_diff(path: &str, original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}
