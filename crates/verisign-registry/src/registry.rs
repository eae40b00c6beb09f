//! First-writer-wins attestation registry.

use tracing::{debug, info, warn};

use crate::context::InvocationContext;
use crate::error::RegistryError;
use crate::fingerprint::Fingerprint;
use crate::record::AttestationRecord;
use crate::store::{AttestationStore, InsertOutcome};

/// Guards the `Fingerprint -> AttestationRecord` mapping.
///
/// The registry is a state-transition function over the store it owns. It
/// does no locking of its own: [`attest`](Self::attest) takes `&mut self`,
/// and the host that owns the registry is responsible for serializing
/// invocations (see `verisign-ledger`).
///
/// # Example
///
/// ```rust
/// use verisign_registry::{
///     AttestationRegistry, CreatorId, Fingerprint, InvocationContext, LogicalTime, MemoryStore,
/// };
///
/// let mut registry = AttestationRegistry::new(MemoryStore::new());
/// let fp = Fingerprint::new([9u8; 32]);
/// assert_eq!(registry.lookup(&fp)?, None);
///
/// let alice = InvocationContext::new(CreatorId::new([1u8; 32]), LogicalTime::from_secs(100));
/// let bob = InvocationContext::new(CreatorId::new([2u8; 32]), LogicalTime::from_secs(200));
///
/// registry.attest(fp, &alice)?;
/// let err = registry.attest(fp, &bob).unwrap_err();
/// assert!(err.is_duplicate());
/// assert_eq!(registry.lookup(&fp)?.map(|r| r.creator), Some(alice.caller()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct AttestationRegistry<S> {
    store: S,
}

impl<S: AttestationStore> AttestationRegistry<S> {
    /// Creates a registry over an explicitly constructed store.
    pub fn new(store: S) -> Self {
        debug!(records = store.len(), "attestation registry initialized");
        Self { store }
    }

    /// Claims `fingerprint` for the caller in `ctx`.
    ///
    /// Succeeds only if no record exists for `fingerprint`. The check and the
    /// insert are a single [`AttestationStore::insert_if_absent`] call.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateAttestation`] if the fingerprint is already
    ///   attested; the stored record is left untouched.
    /// - [`RegistryError::Store`] if the backend fails; nothing is committed.
    pub fn attest(
        &mut self,
        fingerprint: Fingerprint,
        ctx: &InvocationContext,
    ) -> Result<AttestationRecord, RegistryError> {
        let record = AttestationRecord::new(ctx.caller(), ctx.now());

        match self.store.insert_if_absent(fingerprint, record)? {
            InsertOutcome::Inserted => {
                info!(
                    %fingerprint,
                    creator = %record.creator,
                    attested_at = record.attested_at.as_secs(),
                    "attestation accepted"
                );
                Ok(record)
            }
            InsertOutcome::Occupied(existing) => {
                warn!(
                    %fingerprint,
                    caller = %ctx.caller(),
                    owner = %existing.creator,
                    "attestation rejected: fingerprint already attested"
                );
                Err(RegistryError::DuplicateAttestation { fingerprint })
            }
        }
    }

    /// Point read of the committed record for `fingerprint`.
    ///
    /// Returns `Ok(None)` if the fingerprint was never attested.
    pub fn lookup(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<AttestationRecord>, RegistryError> {
        Ok(self.store.get(fingerprint)?)
    }

    /// Returns true if `fingerprint` has a committed record.
    pub fn contains(&self, fingerprint: &Fingerprint) -> Result<bool, RegistryError> {
        Ok(self.lookup(fingerprint)?.is_some())
    }

    /// Number of committed attestations.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if nothing has been attested yet.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Read-only access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the registry and returns its store.
    pub fn into_store(self) -> S {
        self.store
    }
}
