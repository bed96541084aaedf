//! Binary detection and decoding utilities.
//!
//! Quick binary detection using NULL byte scanning.

use memchr::memchr;

use crate::error::IoError;

/// Number of leading bytes inspected by [`is_binary`].
const BINARY_PROBE_LEN: usize = 8192;

/// Quick binary detection - checks first 8KB for NULL bytes.
///
/// Files containing NULL bytes in the first 8KB are considered binary.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = std::cmp::min(buffer.len(), BINARY_PROBE_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}

/// Decode bytes to String, rejecting binary and non-UTF-8 content.
///
/// Content that is going to be written back must round-trip byte for byte,
/// so invalid sequences are an error rather than being replaced with U+FFFD.
///
/// # Errors
/// Returns `IoError::BinaryFile` when binary content is detected and
/// `IoError::Encoding` (with the offset of the first bad byte) when the
/// buffer is not valid UTF-8.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }

    String::from_utf8(buffer).map_err(|e| IoError::Encoding(e.utf8_error().valid_up_to()))
}
