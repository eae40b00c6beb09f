//! Durable storage backends for the Verisign attestation registry.
//!
//! This crate provides:
//! - [`JournalStore`], an [`AttestationStore`] persisted in a `verisign-journal` file
//! - Replay of an existing journal into an in-memory index on open
//! - Recovery from a torn trailing frame in permissive mode
//!
//! The in-memory [`MemoryStore`] from `verisign-registry` is re-exported for
//! callers that want the same API without persistence.

#![deny(missing_docs)]

/// Journal-backed storage implementation.
pub mod journal;

pub use journal::{JournalStore, StoreOptions};
pub use verisign_journal::ReadMode;
pub use verisign_registry::{AttestationStore, InsertOutcome, MemoryStore, StoreError};
