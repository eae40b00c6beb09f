//! Serializing host executor for the Verisign attestation registry.
//!
//! The registry itself trusts whatever [`InvocationContext`] it is handed.
//! This crate is the component that earns that trust:
//! - callers are authenticated by an ed25519 signature over the fingerprint
//! - commit time comes from a [`Clock`] and never decreases
//! - every invocation runs under one lock, so check-and-insert on a key is
//!   never interleaved with another write
//! - batches commit atomically or not at all
//!
//! ## Quick Start
//!
//! ```rust
//! use ed25519_dalek::SigningKey;
//! use verisign_ledger::{Ledger, ManualClock, SignedAttestRequest};
//! use verisign_registry::{Fingerprint, LogicalTime, MemoryStore};
//!
//! let ledger = Ledger::new(MemoryStore::new(), ManualClock::new(LogicalTime::from_secs(1_000)));
//! let key = SigningKey::from_bytes(&[7u8; 32]);
//! let fingerprint = Fingerprint::new([1u8; 32]);
//!
//! let record = ledger.submit(&SignedAttestRequest::sign(&key, fingerprint))?;
//! assert_eq!(record.attested_at, LogicalTime::from_secs(1_000));
//! assert_eq!(ledger.lookup(&fingerprint)?, Some(record));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`InvocationContext`]: verisign_registry::InvocationContext

#![deny(missing_docs)]

/// Caller authentication.
pub mod auth;
/// Logical time sources.
pub mod clock;
/// Ledger error types.
pub mod error;
/// The serializing executor.
pub mod ledger;

pub use auth::{attest_message, authenticate, AuthError, SignedAttestRequest};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::LedgerError;
pub use ledger::Ledger;
