//! Directory traversal.
//!
//! Walks every regular file under a root in file-name order. There is no
//! ignore-list: hidden files and directories are scanned like any other.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RewriteError;

/// Allow-list of file name endings.
///
/// An empty filter accepts every file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixFilter {
    suffixes: BTreeSet<String>,
}

impl SuffixFilter {
    /// Build a filter; entries are trimmed and blank entries dropped.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let suffixes = suffixes
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { suffixes }
    }

    /// Whether the filter accepts everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }

    /// Whether `file_name` ends with one of the suffixes.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.is_empty() || self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

/// A file selected for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path usable for I/O.
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative: String,
}

/// Lazy, restartable walk over the files under a root.
///
/// Symbolic links are not followed unless enabled; when they are, walkdir's
/// ancestor check turns a link cycle into a scan error for that subtree.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: PathBuf,
    filter: SuffixFilter,
    follow_symlinks: bool,
    max_depth: usize,
}

impl Scanner {
    /// Scan `root` with `filter`, not following links, depth 64.
    pub fn new(root: impl Into<PathBuf>, filter: SuffixFilter) -> Self {
        Self {
            root: root.into(),
            filter,
            follow_symlinks: false,
            max_depth: 64,
        }
    }

    /// Follow symbolic links to files and directories.
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Limit how deep below the root the walk descends.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Start a fresh walk.
    ///
    /// Traversal errors are yielded inline; the walk skips the offending
    /// subtree and continues with its siblings.
    pub fn iter(&self) -> impl Iterator<Item = Result<Candidate, RewriteError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    if !self.filter.matches(&entry.file_name().to_string_lossy()) {
                        return None;
                    }
                    Some(Ok(Candidate {
                        relative: self.relative(entry.path()),
                        path: entry.into_path(),
                    }))
                }
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.root.display().to_string(), |p| self.relative(p));
                    let reason = match err.loop_ancestor() {
                        Some(ancestor) => format!("symlink cycle back to {}", ancestor.display()),
                        None => err
                            .io_error()
                            .map_or_else(|| err.to_string(), ToString::to_string),
                    };
                    Some(Err(RewriteError::Scan { path, reason }))
                }
            })
    }

    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}
