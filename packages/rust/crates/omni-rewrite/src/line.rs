//! Line splitting and per-line substitution.
//!
//! Matches never span lines: the pattern only ever sees one line body, with
//! its `\n` or `\r\n` terminator stripped.

use regex::Regex;

use crate::types::ReplaceMode;

/// One line of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// Zero-based line index.
    pub index: usize,
    /// Content without the terminator.
    pub body: &'a str,
    /// `"\n"`, `"\r\n"`, or `""` for an unterminated last line.
    pub terminator: &'a str,
}

/// Split `content` into lines, keeping each line's terminator.
///
/// A trailing newline does not produce an extra empty line, so the count
/// matches what an editor shows. Empty content has no lines.
pub fn split_lines(content: &str) -> impl Iterator<Item = SourceLine<'_>> {
    content
        .split_inclusive('\n')
        .enumerate()
        .map(|(index, raw)| {
            let (body, terminator) = if let Some(body) = raw.strip_suffix("\r\n") {
                (body, &raw[body.len()..])
            } else if let Some(body) = raw.strip_suffix('\n') {
                (body, &raw[body.len()..])
            } else {
                (raw, "")
            };
            SourceLine {
                index,
                body,
                terminator,
            }
        })
}

/// Result of testing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The pattern does not match.
    Unchanged,
    /// The pattern matches; `Some` carries the new body when it differs.
    Matched(Option<String>),
}

/// Compiled pattern plus replacement, applied one line at a time.
#[derive(Debug, Clone)]
pub struct LineRewriter {
    pattern: Regex,
    replacement: String,
    mode: ReplaceMode,
}

impl LineRewriter {
    /// Create a rewriter.
    ///
    /// `replacement` uses `regex` expansion syntax: `$1`, `${name}`, `$$`.
    pub fn new(pattern: Regex, replacement: impl Into<String>, mode: ReplaceMode) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
            mode,
        }
    }

    /// Test and substitute a single line body.
    #[must_use]
    pub fn rewrite_line(&self, body: &str) -> LineOutcome {
        if !self.pattern.is_match(body) {
            return LineOutcome::Unchanged;
        }
        let replaced = match self.mode {
            ReplaceMode::All => self.pattern.replace_all(body, self.replacement.as_str()),
            ReplaceMode::First => self.pattern.replace(body, self.replacement.as_str()),
        };
        if replaced == body {
            LineOutcome::Matched(None)
        } else {
            LineOutcome::Matched(Some(replaced.into_owned()))
        }
    }

    /// Test every line of `content`.
    pub fn rewrite_lines<'a>(
        &'a self,
        content: &'a str,
    ) -> impl Iterator<Item = (SourceLine<'a>, LineOutcome)> + 'a {
        split_lines(content).map(move |line| {
            let outcome = self.rewrite_line(line.body);
            (line, outcome)
        })
    }
}
