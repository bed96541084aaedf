#![allow(clippy::doc_markdown)]

//! omni-io - Safe text file I/O for omni-rewrite
//!
//! Reads files that are about to be edited and writes them back without ever
//! exposing a half-written file.
//!
//! # Features
//!
//! - **Safety**: Binary detection, size limits, strict UTF-8
//! - **Atomic writes**: Temp file in the same directory + rename
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection & decoding
//! ├── read.rs     # Guarded reads
//! └── write.rs    # Atomic replacement
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_io::{read_text_safe, write_text_atomic};
//!
//! let content = read_text_safe("file.txt", 1024 * 1024)?;
//! write_text_atomic("file.txt", &content.replace("foo", "bar"))?;
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod detect;
mod error;
mod read;
mod write;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use error::IoError;
pub use read::read_text_safe;
pub use write::write_text_atomic;

// Re-export detection utilities for advanced use
pub use detect::{decode_buffer, is_binary};
