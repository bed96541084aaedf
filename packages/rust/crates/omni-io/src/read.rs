//! Guarded text reads for files that may be rewritten.
//!
//! Called from rayon workers; everything here blocks.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::detect::decode_buffer;
use crate::error::IoError;

/// Read a whole file as UTF-8 text, refusing anything not safe to edit.
///
/// The size is checked against the open handle, and the read itself is capped
/// at `max_bytes + 1`, so a file that grows after the check is still rejected.
///
/// # Errors
/// `NotFound` for a missing path, `TooLarge` over `max_bytes`, `BinaryFile`
/// or `Encoding` for content that is not text, `System` for anything else.
///
/// ```rust,ignore
/// let text = omni_io::read_text_safe("src/main.rs", 1 << 20)?;
/// ```
pub fn read_text_safe<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<String, IoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => IoError::NotFound(path.display().to_string()),
        _ => IoError::System(e),
    })?;

    let len = file.metadata()?.len();
    if len > max_bytes {
        return Err(IoError::TooLarge(len, max_bytes));
    }

    let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.take(max_bytes.saturating_add(1)).read_to_end(&mut buffer)?;
    let read = buffer.len() as u64;
    if read > max_bytes {
        tracing::debug!(path = %path.display(), "file grew past limit while reading");
        return Err(IoError::TooLarge(read, max_bytes));
    }

    decode_buffer(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn crlf_survives_read() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("crlf.txt");
        std::fs::write(&p, "a\r\nb\r\n").unwrap();
        assert_eq!(read_text_safe(&p, 1024).unwrap(), "a\r\nb\r\n");
    }

    #[test]
    fn limit_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("exact.txt");
        std::fs::write(&p, "0123456789").unwrap();
        assert_eq!(read_text_safe(&p, 10).unwrap(), "0123456789");
        assert!(matches!(read_text_safe(&p, 9), Err(IoError::TooLarge(10, 9))));
    }

    #[test]
    fn directory_is_not_text() {
        let dir = TempDir::new().unwrap();
        assert!(read_text_safe(dir.path(), u64::MAX).is_err());
    }
}
