//! Binary probing and strict decoding.

use omni_io::{IoError, decode_buffer, is_binary};

#[test]
fn nul_anywhere_in_probe_window_is_binary() {
    assert!(is_binary(b"\x00"));
    assert!(is_binary(b"plain text\x00then more"));
    assert!(!is_binary(b"tabs\tand\r\nnewlines"));
    assert!(!is_binary(b""));
}

#[test]
fn utf8_passes_through_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let text = "naïve → ok\r\n";
    assert_eq!(decode_buffer(text.as_bytes().to_vec())?, text);
    Ok(())
}

#[test]
fn binary_wins_over_encoding() {
    // Both NUL and an invalid byte: report as binary.
    let result = decode_buffer(vec![0xff, 0x00, 0x41]);
    assert!(matches!(result, Err(IoError::BinaryFile)));
}

#[test]
fn truncated_multibyte_sequence_is_rejected() {
    let mut bytes = "ok ".as_bytes().to_vec();
    bytes.extend_from_slice(&"→".as_bytes()[..2]);
    assert!(matches!(decode_buffer(bytes), Err(IoError::Encoding(3))));
}
