//! Write-once attestation registry for content fingerprints.
//!
//! This crate provides:
//! - The attestation data model (fingerprints, creator identities, logical time)
//! - The [`AttestationStore`] abstraction with an in-memory implementation
//! - [`AttestationRegistry`], which enforces first-writer-wins per fingerprint
//!
//! Core invariants:
//! - A fingerprint is attested at most once; the first accepted write is permanent
//! - Records are never updated or deleted
//! - Creator and timestamp come from the host-built [`InvocationContext`], never
//!   from the request payload
//! - Only the fingerprint and the two record fields are stored
//!
//! ## Quick Start
//!
//! ```rust
//! use verisign_registry::{
//!     AttestationRegistry, CreatorId, Fingerprint, InvocationContext, LogicalTime, MemoryStore,
//! };
//!
//! let mut registry = AttestationRegistry::new(MemoryStore::new());
//! let fingerprint = Fingerprint::from_bytes(&[7u8; 32])?;
//! let creator = CreatorId::new([1u8; 32]);
//! let ctx = InvocationContext::new(creator, LogicalTime::from_secs(1_700_000_000));
//!
//! let record = registry.attest(fingerprint, &ctx)?;
//! assert_eq!(registry.lookup(&fingerprint)?, Some(record));
//! assert!(registry.attest(fingerprint, &ctx).is_err());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Host-provided invocation context.
pub mod context;
/// Registry error types.
pub mod error;
/// Fingerprint key type.
pub mod fingerprint;
/// Creator identity type.
pub mod identity;
/// Attestation record value type.
pub mod record;
/// The attestation registry.
pub mod registry;
/// Storage abstraction and in-memory backend.
pub mod store;
/// Logical commit time.
pub mod time;

pub use context::InvocationContext;
pub use error::{RegistryError, StoreError};
pub use fingerprint::{Fingerprint, FingerprintError, FINGERPRINT_LEN};
pub use identity::{CreatorId, IdentityError, CREATOR_ID_LEN};
pub use record::AttestationRecord;
pub use registry::AttestationRegistry;
pub use store::{AttestationStore, InsertOutcome, MemoryStore};
pub use time::LogicalTime;
