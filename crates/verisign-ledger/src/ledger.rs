//! The serializing executor that hosts an [`AttestationRegistry`].

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::{info, warn};
use verisign_registry::{
    AttestationRecord, AttestationRegistry, AttestationStore, CreatorId, Fingerprint,
    InvocationContext, LogicalTime, RegistryError,
};

use crate::auth::{authenticate, SignedAttestRequest};
use crate::clock::Clock;
use crate::error::LedgerError;

struct State<S> {
    registry: AttestationRegistry<S>,
    last_commit: LogicalTime,
}

/// Host environment for an attestation registry.
///
/// Supplies what the registry consumes: an authenticated caller, a commit
/// time, and serialized execution. All writes take the same write lock, so
/// for any fingerprint exactly one racing [`submit`](Self::submit) observes
/// it absent. Reads share a read lock and never wait on each other.
///
/// Commit time is `max(clock, last commit)`, seeded from the store's latest
/// record, so it never decreases even across restarts or a clock that steps
/// backwards.
pub struct Ledger<S, C> {
    state: RwLock<State<S>>,
    clock: C,
}

impl<S: AttestationStore, C: Clock> Ledger<S, C> {
    /// Wraps `store` in a registry hosted by this ledger.
    pub fn new(store: S, clock: C) -> Self {
        let last_commit = store.latest_attested_at().unwrap_or(LogicalTime::EPOCH);
        Self {
            state: RwLock::new(State {
                registry: AttestationRegistry::new(store),
                last_commit,
            }),
            clock,
        }
    }

    fn authenticate(request: &SignedAttestRequest) -> Result<CreatorId, LedgerError> {
        authenticate(request).map_err(|err| {
            warn!(
                fingerprint = %request.fingerprint,
                error = %err,
                "rejected unauthenticated request"
            );
            LedgerError::from(err)
        })
    }

    /// Authenticates and executes one attest request.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Auth`] if the signature does not verify
    /// - [`LedgerError::Registry`] with
    ///   [`RegistryError::DuplicateAttestation`] if the fingerprint is taken
    pub fn submit(
        &self,
        request: &SignedAttestRequest,
    ) -> Result<AttestationRecord, LedgerError> {
        let caller = Self::authenticate(request)?;

        let mut state = self.state.write();
        let now = self.clock.now().max(state.last_commit);
        let ctx = InvocationContext::new(caller, now);
        let record = state.registry.attest(request.fingerprint, &ctx)?;
        state.last_commit = now;
        Ok(record)
    }

    /// Executes `requests` as one atomic group.
    ///
    /// Every request is authenticated and every fingerprint is checked, both
    /// against committed state and against earlier requests in the same
    /// batch, before anything is written. If any check fails nothing is
    /// committed. Otherwise all records are written in order with one shared
    /// commit time.
    ///
    /// A backend failure while writing can leave a prefix of the batch
    /// committed; that is an environment failure, not a domain outcome.
    pub fn submit_batch(
        &self,
        requests: &[SignedAttestRequest],
    ) -> Result<Vec<AttestationRecord>, LedgerError> {
        if requests.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }

        let reject = |index: usize, source: LedgerError| LedgerError::BatchRejected {
            index,
            source: Box::new(source),
        };

        let callers = requests
            .iter()
            .enumerate()
            .map(|(index, request)| Self::authenticate(request).map_err(|e| reject(index, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.state.write();

        let mut staged: HashSet<Fingerprint> = HashSet::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let fingerprint = request.fingerprint;
            let committed = state
                .registry
                .contains(&fingerprint)
                .map_err(|e| reject(index, e.into()))?;
            if committed || !staged.insert(fingerprint) {
                warn!(%fingerprint, index, "batch rejected: fingerprint already attested");
                return Err(reject(
                    index,
                    RegistryError::DuplicateAttestation { fingerprint }.into(),
                ));
            }
        }

        let now = self.clock.now().max(state.last_commit);
        let mut records = Vec::with_capacity(requests.len());
        for (index, (request, caller)) in requests.iter().zip(callers).enumerate() {
            let ctx = InvocationContext::new(caller, now);
            let record = state
                .registry
                .attest(request.fingerprint, &ctx)
                .map_err(|e| reject(index, e.into()))?;
            records.push(record);
        }
        state.last_commit = now;

        info!(size = records.len(), attested_at = now.as_secs(), "batch committed");
        Ok(records)
    }

    /// Point read against the latest committed state.
    pub fn lookup(
        &self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<AttestationRecord>, LedgerError> {
        Ok(self.state.read().registry.lookup(fingerprint)?)
    }

    /// Number of committed attestations.
    pub fn len(&self) -> usize {
        self.state.read().registry.len()
    }

    /// Returns true if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.state.read().registry.is_empty()
    }

    /// Commit time of the most recent accepted write.
    pub fn last_commit(&self) -> LogicalTime {
        self.state.read().last_commit
    }

    /// Consumes the ledger and returns the hosted registry.
    pub fn into_registry(self) -> AttestationRegistry<S> {
        self.state.into_inner().registry
    }
}
