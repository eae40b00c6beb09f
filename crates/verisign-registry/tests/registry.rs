use proptest::prelude::*;
use std::collections::HashMap;
use verisign_registry::{
    AttestationRecord, AttestationRegistry, AttestationStore, CreatorId, Fingerprint,
    InsertOutcome, InvocationContext, LogicalTime, MemoryStore, RegistryError, StoreError,
};

fn fp(byte: u8) -> Fingerprint {
    Fingerprint::new([byte; 32])
}

fn ctx(creator: u8, secs: u64) -> InvocationContext {
    InvocationContext::new(CreatorId::new([creator; 32]), LogicalTime::from_secs(secs))
}

const A: u8 = 0xA1;
const B: u8 = 0xB2;

#[test]
fn lookup_on_empty_registry_is_absent() {
    let registry = AttestationRegistry::new(MemoryStore::new());
    assert_eq!(registry.lookup(&fp(1)).unwrap(), None);
    assert!(registry.is_empty());
}

#[test]
fn attest_returns_and_stores_record_from_context() {
    let mut registry = AttestationRegistry::new(MemoryStore::new());

    let record = registry.attest(fp(1), &ctx(A, 1_000)).unwrap();

    assert_eq!(record.creator, CreatorId::new([A; 32]));
    assert_eq!(record.attested_at, LogicalTime::from_secs(1_000));
    assert_eq!(registry.lookup(&fp(1)).unwrap(), Some(record));
    assert_eq!(registry.len(), 1);
}

#[test]
fn second_attest_is_rejected_and_changes_nothing() {
    let mut registry = AttestationRegistry::new(MemoryStore::new());
    let first = registry.attest(fp(1), &ctx(A, 1_000)).unwrap();

    let err = registry.attest(fp(1), &ctx(B, 2_000)).unwrap_err();

    match err {
        RegistryError::DuplicateAttestation { fingerprint } => assert_eq!(fingerprint, fp(1)),
        other => panic!("expected DuplicateAttestation, got {other:?}"),
    }
    assert_eq!(registry.lookup(&fp(1)).unwrap(), Some(first));
    assert_eq!(registry.len(), 1);
}

#[test]
fn same_caller_cannot_reattest_either() {
    let mut registry = AttestationRegistry::new(MemoryStore::new());
    registry.attest(fp(1), &ctx(A, 1_000)).unwrap();

    let err = registry.attest(fp(1), &ctx(A, 1_000)).unwrap_err();
    assert!(err.is_duplicate());
}

#[test]
fn attesting_other_fingerprint_is_independent() {
    let mut registry = AttestationRegistry::new(MemoryStore::new());
    let h1 = registry.attest(fp(1), &ctx(A, 1_000)).unwrap();

    let h2 = registry.attest(fp(2), &ctx(A, 1_500)).unwrap();

    assert_eq!(h2.attested_at, LogicalTime::from_secs(1_500));
    assert_eq!(registry.lookup(&fp(1)).unwrap(), Some(h1));
    assert_eq!(registry.lookup(&fp(2)).unwrap(), Some(h2));
}

#[test]
fn fingerprints_differing_in_one_byte_are_distinct_keys() {
    let mut registry = AttestationRegistry::new(MemoryStore::new());
    let mut bytes = [0u8; 32];
    registry
        .attest(Fingerprint::new(bytes), &ctx(A, 1))
        .unwrap();

    bytes[31] = 1;
    assert_eq!(registry.lookup(&Fingerprint::new(bytes)).unwrap(), None);
    registry
        .attest(Fingerprint::new(bytes), &ctx(B, 2))
        .unwrap();
    assert_eq!(registry.len(), 2);
}

/// Store whose writes always fail, for checking error propagation.
struct FailingStore;

impl AttestationStore for FailingStore {
    fn get(&self, _: &Fingerprint) -> Result<Option<AttestationRecord>, StoreError> {
        Ok(None)
    }

    fn insert_if_absent(
        &mut self,
        _: Fingerprint,
        _: AttestationRecord,
    ) -> Result<InsertOutcome, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn len(&self) -> usize {
        0
    }

    fn latest_attested_at(&self) -> Option<LogicalTime> {
        None
    }
}

#[test]
fn store_failure_is_not_a_duplicate() {
    let mut registry = AttestationRegistry::new(FailingStore);
    let err = registry.attest(fp(1), &ctx(A, 1)).unwrap_err();

    assert!(matches!(err, RegistryError::Store(StoreError::Io(_))));
    assert!(!err.is_duplicate());
    assert_eq!(registry.lookup(&fp(1)).unwrap(), None);
}

proptest! {
    /// Arbitrary call sequences: at most one success per key, the first one
    /// wins, and a key never attested stays absent.
    #[test]
    fn first_writer_wins_for_every_key(
        calls in prop::collection::vec((0u8..8, any::<u8>()), 0..64),
        unseen in 8u8..16,
    ) {
        let mut registry = AttestationRegistry::new(MemoryStore::new());
        let mut expected: HashMap<Fingerprint, AttestationRecord> = HashMap::new();

        for (i, (key, creator)) in calls.iter().enumerate() {
            let context = ctx(*creator, i as u64);
            let result = registry.attest(fp(*key), &context);

            match expected.get(&fp(*key)) {
                Some(_) => prop_assert!(result.unwrap_err().is_duplicate()),
                None => {
                    let record = result.unwrap();
                    prop_assert_eq!(record.creator, context.caller());
                    prop_assert_eq!(record.attested_at, context.now());
                    expected.insert(fp(*key), record);
                }
            }
        }

        for (key, record) in &expected {
            prop_assert_eq!(registry.lookup(key).unwrap(), Some(*record));
        }
        prop_assert_eq!(registry.len(), expected.len());
        prop_assert_eq!(registry.lookup(&fp(unseen)).unwrap(), None);
    }
}
