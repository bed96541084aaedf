//! Guarded reads: what the rewrite engine is allowed to load.

use tempfile::TempDir;

use omni_io::{IoError, read_text_safe};

fn fixture(bytes: &[u8]) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("file");
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}

#[test]
fn reads_utf8_text_verbatim() {
    let (_dir, path) = fixture("héllo\nwörld\n".as_bytes());
    assert_eq!(read_text_safe(&path, 1024).unwrap(), "héllo\nwörld\n");
}

#[test]
fn empty_file_is_empty_text() {
    let (_dir, path) = fixture(b"");
    assert_eq!(read_text_safe(&path, 0).unwrap(), "");
}

#[test]
fn nul_bytes_mark_binary() {
    let (_dir, path) = fixture(b"PK\x03\x04\x00\x00");
    assert!(matches!(read_text_safe(&path, 1024), Err(IoError::BinaryFile)));
}

#[test]
fn latin1_is_rejected_with_offset() {
    let (_dir, path) = fixture(&[b'c', b'a', b'f', 0xe9, b'\n']);
    assert!(matches!(read_text_safe(&path, 1024), Err(IoError::Encoding(3))));
}

#[test]
fn oversized_reports_both_sizes() {
    let (_dir, path) = fixture(&[b'x'; 20]);
    assert!(matches!(
        read_text_safe(&path, 10),
        Err(IoError::TooLarge(20, 10))
    ));
}

#[test]
fn missing_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = read_text_safe(dir.path().join("gone.txt"), 1024);
    assert!(matches!(result, Err(IoError::NotFound(_))));
}
