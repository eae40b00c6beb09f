use std::fs;
use tempfile::TempDir;
use verisign_journal::{JournalEntry, JournalWriter, WriteOptions};
use verisign_registry::{
    AttestationRecord, AttestationRegistry, CreatorId, Fingerprint, InvocationContext,
    LogicalTime, RegistryError,
};
use verisign_store::{
    AttestationStore, InsertOutcome, JournalStore, ReadMode, StoreError, StoreOptions,
};

fn fp(byte: u8) -> Fingerprint {
    Fingerprint::new([byte; 32])
}

fn record(creator: u8, secs: u64) -> AttestationRecord {
    AttestationRecord::new(CreatorId::new([creator; 32]), LogicalTime::from_secs(secs))
}

fn ctx(creator: u8, secs: u64) -> InvocationContext {
    InvocationContext::new(CreatorId::new([creator; 32]), LogicalTime::from_secs(secs))
}

#[test]
fn test_open_creates_empty_journal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    let store = JournalStore::open(&path, StoreOptions::default()).unwrap();

    assert!(store.is_empty());
    assert_eq!(store.latest_attested_at(), None);
    assert_eq!(store.path(), path.as_path());
    assert_eq!(fs::metadata(&path).unwrap().len(), 16);
}

#[test]
fn test_records_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    {
        let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        assert_eq!(
            store.insert_if_absent(fp(1), record(0xA, 100)).unwrap(),
            InsertOutcome::Inserted
        );
        store.insert_if_absent(fp(2), record(0xB, 120)).unwrap();
        store.finish().unwrap();
    }

    let store = JournalStore::open(&path, StoreOptions::default()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&fp(1)).unwrap(), Some(record(0xA, 100)));
    assert_eq!(store.get(&fp(2)).unwrap(), Some(record(0xB, 120)));
    assert_eq!(store.get(&fp(3)).unwrap(), None);
    assert_eq!(store.latest_attested_at(), Some(LogicalTime::from_secs(120)));
}

#[test]
fn test_occupied_insert_does_not_touch_journal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
    store.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
    let size = fs::metadata(&path).unwrap().len();

    assert_eq!(
        store.insert_if_absent(fp(1), record(0xB, 200)).unwrap(),
        InsertOutcome::Occupied(record(0xA, 100))
    );
    assert_eq!(fs::metadata(&path).unwrap().len(), size);
}

#[test]
fn test_duplicate_rejected_after_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    {
        let store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        let mut registry = AttestationRegistry::new(store);
        registry.attest(fp(1), &ctx(0xA, 100)).unwrap();
    }

    let store = JournalStore::open(&path, StoreOptions::default()).unwrap();
    let mut registry = AttestationRegistry::new(store);
    let err = registry.attest(fp(1), &ctx(0xB, 200)).unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateAttestation { .. }));
    assert_eq!(registry.lookup(&fp(1)).unwrap(), Some(record(0xA, 100)));
}

#[test]
fn test_duplicate_in_journal_is_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    let mut writer = JournalWriter::open(&path, WriteOptions::default()).unwrap();
    writer
        .append_entry(&JournalEntry::new(fp(1), record(0xA, 100)))
        .unwrap();
    writer
        .append_entry(&JournalEntry::new(fp(1), record(0xB, 200)))
        .unwrap();
    writer.finish().unwrap();

    match JournalStore::open(&path, StoreOptions::default()) {
        Err(StoreError::Corrupt(reason)) => assert!(reason.contains("more than once")),
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

fn tear_last_frame(path: &std::path::Path) {
    let len = fs::metadata(path).unwrap().len();
    let file = fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_len(len - 7).unwrap();
}

#[test]
fn test_torn_tail_fails_in_strict_mode() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");
    {
        let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        store.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
        store.insert_if_absent(fp(2), record(0xA, 101)).unwrap();
    }
    tear_last_frame(&path);

    assert!(matches!(
        JournalStore::open(&path, StoreOptions::default()),
        Err(StoreError::Backend(_))
    ));
}

#[test]
fn test_torn_tail_recovered_in_permissive_mode() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");
    {
        let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        store.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
        store.insert_if_absent(fp(2), record(0xA, 101)).unwrap();
    }
    tear_last_frame(&path);

    let options = StoreOptions {
        read_mode: ReadMode::Permissive,
        ..StoreOptions::default()
    };
    {
        let mut store = JournalStore::open(&path, options.clone()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&fp(2)).unwrap(), None);
        // The torn claim never committed, so the key is free again.
        store.insert_if_absent(fp(2), record(0xB, 150)).unwrap();
    }

    let store = JournalStore::open(&path, StoreOptions::default()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(&fp(2)).unwrap(), Some(record(0xB, 150)));
}

#[test]
fn test_second_writer_is_locked_out() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    let mut first = JournalStore::open(&path, StoreOptions::default()).unwrap();
    match JournalStore::open(&path, StoreOptions::default()) {
        Err(StoreError::Backend(err)) => assert!(err.to_string().contains("locked")),
        other => panic!("expected a lock error, got {other:?}"),
    }

    first.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
    first.insert_if_absent(fp(2), record(0xA, 101)).unwrap();
    drop(first);

    let mut second = JournalStore::open(&path, StoreOptions::default()).unwrap();
    assert_eq!(
        second.insert_if_absent(fp(1), record(0xB, 200)).unwrap(),
        InsertOutcome::Occupied(record(0xA, 100))
    );
    second.insert_if_absent(fp(3), record(0xB, 201)).unwrap();
    drop(second);

    let store = JournalStore::open(&path, StoreOptions::default()).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(store.get(&fp(1)).unwrap(), Some(record(0xA, 100)));
    assert_eq!(store.get(&fp(2)).unwrap(), Some(record(0xA, 101)));
}

#[test]
fn test_waiting_writer_sees_earlier_commit() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");

    let mut first = JournalStore::open(&path, StoreOptions::default()).unwrap();
    first.insert_if_absent(fp(1), record(0xA, 100)).unwrap();

    let waiting_path = path.clone();
    let waiter = std::thread::spawn(move || {
        let options = StoreOptions {
            wait_for_lock: true,
            ..StoreOptions::default()
        };
        let mut store = JournalStore::open(&waiting_path, options).unwrap();
        store.insert_if_absent(fp(1), record(0xB, 200)).unwrap()
    });

    std::thread::sleep(std::time::Duration::from_millis(50));
    drop(first);

    assert_eq!(
        waiter.join().unwrap(),
        InsertOutcome::Occupied(record(0xA, 100))
    );
}

#[test]
fn test_read_only_store_never_writes() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");
    {
        let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        store.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
        store.insert_if_absent(fp(2), record(0xA, 101)).unwrap();
    }
    tear_last_frame(&path);
    let size = fs::metadata(&path).unwrap().len();

    assert!(JournalStore::open_read_only(&path, ReadMode::Strict).is_err());

    let mut store = JournalStore::open_read_only(&path, ReadMode::Permissive).unwrap();
    assert!(store.is_read_only());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&fp(1)).unwrap(), Some(record(0xA, 100)));
    assert!(store.insert_if_absent(fp(3), record(0xB, 200)).is_err());
    assert_eq!(store.get(&fp(3)).unwrap(), None);
    store.finish().unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), size);
}

#[test]
fn test_read_only_store_does_not_create_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing.vsj");

    assert!(matches!(
        JournalStore::open_read_only(&path, ReadMode::Strict),
        Err(StoreError::Io(_))
    ));
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn test_read_only_store_opens_unwritable_file() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registry.vsj");
    {
        let mut store = JournalStore::open(&path, StoreOptions::default()).unwrap();
        store.insert_if_absent(fp(1), record(0xA, 100)).unwrap();
    }
    fs::set_permissions(&path, fs::Permissions::from_mode(0o444)).unwrap();

    let store = JournalStore::open_read_only(&path, ReadMode::Strict).unwrap();
    assert_eq!(store.get(&fp(1)).unwrap(), Some(record(0xA, 100)));
}
