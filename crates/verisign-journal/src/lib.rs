//! Append-only journal format for accepted attestations.
//!
//! This crate provides:
//! - Framed, append-only storage of attestation entries
//! - Reader/writer APIs with strict and permissive modes
//! - A journal check that re-verifies the write-once invariant offline
//!
//! ## Quick Start
//!
//! ```rust
//! use verisign_journal::{JournalEntry, JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use verisign_registry::{AttestationRecord, CreatorId, Fingerprint, LogicalTime};
//!
//! let dir = tempfile::tempdir()?;
//! let path = dir.path().join("registry.vsj");
//!
//! let entry = JournalEntry::new(
//!     Fingerprint::new([1u8; 32]),
//!     AttestationRecord::new(CreatorId::new([2u8; 32]), LogicalTime::from_secs(1_700_000_000)),
//! );
//!
//! let mut writer = JournalWriter::open(&path, WriteOptions::default())?;
//! writer.append_entry(&entry)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open(&path, ReadMode::Strict)?;
//! assert_eq!(reader.read_entry()?, Some(entry));
//! assert_eq!(reader.read_entry()?, None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Layout
//!
//! A 16-byte header (`VSJ1`, version, flags, reserved) followed by record
//! frames. Each frame is an 8-byte header (kind, reserved, little-endian
//! length) and a payload. Attestation frames carry a 72-byte payload: the
//! fingerprint followed by the record's fixed binary layout.

#![deny(missing_docs)]

/// Journal entry type and payload codec.
pub mod entry;
/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Offline invariant checks over a journal.
pub mod verification;
/// Journal writer implementation.
pub mod writer;

pub use entry::JournalEntry;
pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use verification::{verify_journal, JournalReport, TimeRegression};
pub use writer::{JournalWriter, WriteOptions};
