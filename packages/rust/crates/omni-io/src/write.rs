//! Atomic file replacement.
//!
//! Content is staged in a temporary file next to the target and renamed into
//! place, so readers observe either the old bytes or the new bytes.

use std::borrow::Cow;
use std::fs as std_fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::IoError;

/// Replace the contents of `path` with `content` atomically.
///
/// The temporary file lives in the target's directory (a rename across
/// filesystems is not atomic). Existing permissions are carried over, and a
/// symlinked target is resolved so the link itself survives.
///
/// On any error the original file is left untouched and the temporary file
/// is removed.
///
/// # Errors
/// `System` for staging failures, `Persist` when the final rename fails.
pub fn write_text_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    let target: Cow<'_, Path> = match std_fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => Cow::Owned(std_fs::canonicalize(path)?),
        _ => Cow::Borrowed(path),
    };

    let parent = match target.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(IoError::NoParent(target.to_path_buf())),
    };

    let permissions = std_fs::metadata(&target).ok().map(|m| m.permissions());

    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_bytes())?;
    staged.as_file().sync_all()?;
    if let Some(permissions) = permissions {
        staged.as_file().set_permissions(permissions)?;
    }

    staged.persist(&*target).map_err(|e| IoError::Persist {
        path: target.to_path_buf(),
        source: e.error,
    })?;

    tracing::debug!(path = %target.display(), bytes = content.len(), "replaced file atomically");
    Ok(())
}
