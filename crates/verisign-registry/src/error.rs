use crate::fingerprint::Fingerprint;
use thiserror::Error;

/// Errors reported by a storage backend.
///
/// These are environment failures, not domain outcomes.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Persisted state violates the write-once invariant or is unreadable.
    #[error("corrupt store: {0}")]
    Corrupt(String),
    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    /// Wraps a backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

/// Errors returned by [`AttestationRegistry`](crate::AttestationRegistry).
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The fingerprint already has a committed record.
    #[error("content already attested: {fingerprint}")]
    DuplicateAttestation {
        /// Fingerprint that was already claimed.
        fingerprint: Fingerprint,
    },
    /// The storage backend failed; nothing was committed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Returns true for the first-writer-wins rejection.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, RegistryError::DuplicateAttestation { .. })
    }
}
