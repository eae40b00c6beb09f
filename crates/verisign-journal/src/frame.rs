//! On-disk layout: one file header, then length-prefixed frames.
//!
//! ```text
//! header  | "VSJ1" | version u16 LE | flags u16 LE (0) | 8 zero bytes |
//! frame   | kind u8 | 3 zero bytes | len u32 LE | payload (len bytes) |
//! ```

use crate::errors::JournalError;

/// Journal file magic bytes.
pub const MAGIC: &[u8; 4] = b"VSJ1";

/// Format version written by this crate.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Largest payload a frame may carry (64 KiB).
pub const MAX_PAYLOAD_SIZE: u32 = 64 * 1024;

/// Frame kind byte of an attestation entry.
pub const FRAME_KIND_ATTESTATION: u8 = 0x01;

/// The 16-byte file header. Only version `0x0001` with zero flags exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalHeader;

impl JournalHeader {
    /// Header size constant.
    pub const HEADER_SIZE: usize = HEADER_SIZE;

    /// The current header.
    pub fn new() -> Self {
        JournalHeader
    }

    /// Encodes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&VERSION.to_le_bytes());
        bytes
    }

    /// Checks that `bytes` start with a header this crate can read.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, JournalError> {
        let invalid = |reason: String| Err(JournalError::InvalidHeader(reason));

        let Some(bytes) = bytes.get(..HEADER_SIZE) else {
            return invalid(format!("header too short: {} bytes", bytes.len()));
        };
        if &bytes[..4] != MAGIC {
            return invalid(format!("not a verisign journal (magic {:02x?})", &bytes[..4]));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return invalid(format!("unsupported version 0x{:04x}", version));
        }
        if bytes[6..].iter().any(|&b| b != 0) {
            return invalid("non-zero flags or reserved bytes".to_string());
        }
        Ok(JournalHeader)
    }
}

/// What a frame's payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// A [`JournalEntry`](crate::JournalEntry).
    Attestation,
    /// A kind this version does not know; readers skip it.
    Unknown(u8),
}

impl FrameKind {
    /// Decodes a kind byte.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            FRAME_KIND_ATTESTATION => FrameKind::Attestation,
            other => FrameKind::Unknown(other),
        }
    }

    /// Encodes the kind byte.
    pub fn to_byte(self) -> u8 {
        match self {
            FrameKind::Attestation => FRAME_KIND_ATTESTATION,
            FrameKind::Unknown(b) => b,
        }
    }
}

/// Decoded 8-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFrame {
    /// Payload kind.
    pub kind: FrameKind,
    /// Payload length in bytes.
    pub len: u32,
}

impl RecordFrame {
    /// Frame header size constant.
    pub const FRAME_HEADER_SIZE: usize = FRAME_HEADER_SIZE;

    /// Builds a frame header, rejecting payloads over [`MAX_PAYLOAD_SIZE`].
    pub fn new(kind: FrameKind, len: u32) -> Result<Self, JournalError> {
        if len > MAX_PAYLOAD_SIZE {
            return Err(JournalError::PayloadTooLarge {
                size: len,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self { kind, len })
    }

    /// Encodes the frame header.
    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_SIZE] {
        let mut bytes = [0u8; FRAME_HEADER_SIZE];
        bytes[0] = self.kind.to_byte();
        bytes[4..].copy_from_slice(&self.len.to_le_bytes());
        bytes
    }

    /// Decodes the frame header found at byte `offset` of the journal.
    pub fn from_bytes(
        bytes: &[u8; FRAME_HEADER_SIZE],
        offset: u64,
    ) -> Result<Self, JournalError> {
        let invalid = |reason: String| Err(JournalError::InvalidFrame { offset, reason });

        if bytes[1..4] != [0; 3] {
            return invalid("non-zero reserved bytes".to_string());
        }
        let len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if len > MAX_PAYLOAD_SIZE {
            return invalid(format!("payload size {} exceeds maximum {}", len, MAX_PAYLOAD_SIZE));
        }
        Ok(Self {
            kind: FrameKind::from_byte(bytes[0]),
            len,
        })
    }
}
