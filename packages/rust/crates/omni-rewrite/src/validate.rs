//! Request validation.
//!
//! Turns a loosely filled [`Query`] into a [`ValidatedQuery`]. The pattern is
//! compiled before the directory is looked at, so a bad pattern never causes
//! filesystem access.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::RewriteError;
use crate::line::LineRewriter;
use crate::scan::SuffixFilter;
use crate::types::{Query, QueryConfig};

/// A query that passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedQuery {
    /// Existing directory to scan.
    pub root: PathBuf,
    /// File name filter.
    pub suffixes: SuffixFilter,
    /// Compiled pattern and replacement.
    pub rewriter: LineRewriter,
    /// Persist rewrites.
    pub commit: bool,
}

/// Split a raw suffix field on whitespace.
///
/// `"  "` yields an empty list (no filtering), never `[""]`.
#[must_use]
pub fn parse_suffixes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Validate and normalize `query`.
///
/// # Errors
/// `RewriteError::InvalidRequest` with one of `directory not specified`,
/// `pattern not specified`, `invalid pattern`, `directory not found`.
pub fn validate_query(query: &Query, config: &QueryConfig) -> Result<ValidatedQuery, RewriteError> {
    let directory = query.directory.trim();
    if directory.is_empty() {
        return Err(RewriteError::invalid("directory not specified"));
    }
    if query.match_content.is_empty() {
        return Err(RewriteError::invalid("pattern not specified"));
    }

    let pattern = Regex::new(&query.match_content).map_err(|e| {
        tracing::debug!(pattern = %query.match_content, error = %e, "rejected pattern");
        RewriteError::invalid("invalid pattern")
    })?;

    let root = resolve_directory(&config.data_root, directory);
    if !root.is_dir() {
        return Err(RewriteError::invalid("directory not found"));
    }

    Ok(ValidatedQuery {
        root,
        suffixes: SuffixFilter::new(&query.file_suffixes),
        rewriter: LineRewriter::new(pattern, query.replace_content.clone(), config.replace_mode),
        commit: query.commit,
    })
}

fn resolve_directory(data_root: &Path, directory: &str) -> PathBuf {
    let path = Path::new(directory);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn query(directory: &str, pattern: &str) -> Query {
        Query {
            directory: directory.to_string(),
            match_content: pattern.to_string(),
            ..Query::default()
        }
    }

    fn message(err: RewriteError) -> String {
        err.to_string()
    }

    #[test]
    fn test_parse_suffixes_whitespace_only_is_no_filter() {
        assert!(parse_suffixes("   \t ").is_empty());
        assert_eq!(parse_suffixes(" .rs  .toml\n"), vec![".rs", ".toml"]);
    }

    #[test]
    fn test_rejects_empty_directory() {
        let err = validate_query(&query("  ", "x"), &QueryConfig::default()).unwrap_err();
        assert_eq!(message(err), "directory not specified");
    }

    #[test]
    fn test_rejects_empty_pattern() {
        let err = validate_query(&query(".", ""), &QueryConfig::default()).unwrap_err();
        assert_eq!(message(err), "pattern not specified");
    }

    #[test]
    fn test_invalid_pattern_checked_before_directory() {
        let err = validate_query(&query("/definitely/not/here", "("), &QueryConfig::default())
            .unwrap_err();
        assert_eq!(message(err), "invalid pattern");
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = QueryConfig {
            data_root: dir.path().to_path_buf(),
            ..QueryConfig::default()
        };
        let err = validate_query(&query("nope", "x"), &config).unwrap_err();
        assert_eq!(message(err), "directory not found");
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("f.txt"), "").unwrap();
        let config = QueryConfig {
            data_root: dir.path().to_path_buf(),
            ..QueryConfig::default()
        };
        let err = validate_query(&query("f.txt", "x"), &config).unwrap_err();
        assert_eq!(message(err), "directory not found");
    }

    #[test]
    fn test_relative_directory_resolves_against_data_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        let config = QueryConfig {
            data_root: dir.path().to_path_buf(),
            ..QueryConfig::default()
        };
        let mut q = query(" src ", "x");
        q.file_suffixes = vec![" ".to_string(), ".rs".to_string()];
        q.commit = true;

        let validated = validate_query(&q, &config).unwrap();

        assert_eq!(validated.root, dir.path().join("src"));
        assert!(validated.suffixes.matches("lib.rs"));
        assert!(!validated.suffixes.matches("lib.py"));
        assert!(validated.commit);
    }

    #[test]
    fn test_absolute_directory_ignores_data_root() {
        let dir = TempDir::new().unwrap();
        let q = query(&dir.path().display().to_string(), "x");
        let validated = validate_query(&q, &QueryConfig::default()).unwrap();
        assert_eq!(validated.root, dir.path());
    }
}
