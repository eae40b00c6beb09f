use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::StoreError;
use crate::fingerprint::Fingerprint;
use crate::record::AttestationRecord;
use crate::time::LogicalTime;

/// Result of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The slot was empty and now holds the new record.
    Inserted,
    /// The slot was already taken; carries the record that holds it.
    Occupied(AttestationRecord),
}

/// Keyed storage for attestation records.
///
/// Implementations own the mapping exclusively. The only write is
/// [`insert_if_absent`](Self::insert_if_absent), a compare-and-set on the
/// key's slot: either the slot was empty and is filled, or nothing changes.
/// Mutation requires `&mut self`, so callers serialize writes by ownership
/// rather than by locks inside the store.
pub trait AttestationStore {
    /// Point read. Returns a copy of the stored record.
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<AttestationRecord>, StoreError>;

    /// Inserts `record` under `fingerprint` unless the slot is already taken.
    ///
    /// On `Err` or [`InsertOutcome::Occupied`] the store is unchanged.
    fn insert_if_absent(
        &mut self,
        fingerprint: Fingerprint,
        record: AttestationRecord,
    ) -> Result<InsertOutcome, StoreError>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Returns true if no record has been stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest `attested_at` among stored records.
    fn latest_attested_at(&self) -> Option<LogicalTime>;
}

/// In-memory store backed by a `HashMap`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<Fingerprint, AttestationRecord>,
    latest: Option<LogicalTime>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttestationStore for MemoryStore {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<AttestationRecord>, StoreError> {
        Ok(self.entries.get(fingerprint).copied())
    }

    fn insert_if_absent(
        &mut self,
        fingerprint: Fingerprint,
        record: AttestationRecord,
    ) -> Result<InsertOutcome, StoreError> {
        match self.entries.entry(fingerprint) {
            Entry::Occupied(existing) => Ok(InsertOutcome::Occupied(*existing.get())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                self.latest = self.latest.max(Some(record.attested_at));
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn latest_attested_at(&self) -> Option<LogicalTime> {
        self.latest
    }
}
