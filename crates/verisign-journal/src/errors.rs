use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (kind, reserved bytes, or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: u32,
        /// Maximum allowed size.
        max: u32,
    },
    /// Attestation payload has the wrong length.
    #[error("invalid entry at offset {offset}: expected {expected} bytes, got {actual}")]
    InvalidEntry {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Required payload length.
        expected: usize,
        /// Actual payload length.
        actual: usize,
    },
    /// File is too short to hold a header but not empty.
    #[error("file is not empty; cannot initialize header")]
    FileNotEmpty,
    /// Another writer holds the journal's lock.
    #[error("journal {} is locked by another writer", .path.display())]
    Locked {
        /// Journal path.
        path: PathBuf,
    },
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset where the truncated frame starts.
        offset: u64,
    },
}
