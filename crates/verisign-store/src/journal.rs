use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use verisign_journal::frame::FRAME_HEADER_SIZE;
use verisign_journal::{
    JournalEntry, JournalError, JournalReader, JournalWriter, ReadMode, WriteOptions,
};
use verisign_registry::{
    AttestationRecord, AttestationStore, Fingerprint, InsertOutcome, LogicalTime, StoreError,
};

/// Options for opening a [`JournalStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Whether to fsync after each accepted write (default: false).
    pub sync: bool,
    /// How to treat a torn trailing frame on open (default: strict).
    ///
    /// In [`ReadMode::Permissive`] a writable store cuts the torn bytes off
    /// before any new append and a read-only store ignores them; in
    /// [`ReadMode::Strict`] opening fails.
    pub read_mode: ReadMode,
    /// Wait for another process to release the journal instead of failing
    /// (default: false).
    pub wait_for_lock: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            sync: false,
            read_mode: ReadMode::Strict,
            wait_for_lock: false,
        }
    }
}

fn journal_error(err: JournalError) -> StoreError {
    match err {
        JournalError::Io(io) => StoreError::Io(io),
        other => StoreError::backend(other),
    }
}

/// Records replayed from a journal.
struct Replay {
    index: HashMap<Fingerprint, AttestationRecord>,
    latest: Option<LogicalTime>,
    /// Offset just past the last complete frame.
    len: u64,
    torn_tail: bool,
}

impl Replay {
    fn read(path: &Path, mut reader: JournalReader) -> Result<Self, StoreError> {
        let mut index = HashMap::new();
        let mut latest: Option<LogicalTime> = None;
        while let Some(entry) = reader.read_entry().map_err(journal_error)? {
            if index.insert(entry.fingerprint, entry.record).is_some() {
                return Err(StoreError::Corrupt(format!(
                    "fingerprint {} attested more than once in {}",
                    entry.fingerprint,
                    path.display()
                )));
            }
            latest = latest.max(Some(entry.record.attested_at));
        }

        debug!(path = %path.display(), records = index.len(), "journal replayed");
        Ok(Self {
            index,
            latest,
            len: reader.position(),
            torn_tail: reader.has_trailing_bytes(),
        })
    }
}

/// Attestation store persisted in an append-only journal.
///
/// Every accepted record is appended to the journal before it becomes
/// visible in the in-memory index. Opening a store replays the journal, so
/// a restarted process sees exactly the records committed before it stopped.
///
/// A writable store owns the journal's writer lock for its whole lifetime:
/// a second writable store on the same file, in this process or another,
/// waits or fails at [`open`](Self::open). A read-only store is a snapshot
/// taken under a shared lock and rejects inserts.
pub struct JournalStore {
    path: PathBuf,
    writer: Option<JournalWriter>,
    index: HashMap<Fingerprint, AttestationRecord>,
    latest: Option<LogicalTime>,
    /// Journal length after the last complete frame.
    len: u64,
}

impl JournalStore {
    /// Opens or creates the journal at `path`, locks it and replays it.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Corrupt`] if a fingerprint appears twice in the journal
    /// - [`StoreError::Backend`] for structural journal errors (including a
    ///   torn tail in strict mode) and when another writer holds the journal
    ///   and `options.wait_for_lock` is off
    /// - [`StoreError::Io`] for I/O failures
    pub fn open<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self, StoreError> {
        let write_options = WriteOptions {
            sync: options.sync,
            create: true,
            append: true,
            wait_for_lock: options.wait_for_lock,
        };
        let writer = JournalWriter::open(path.as_ref(), write_options).map_err(journal_error)?;
        Self::with_writer(path.as_ref(), writer, options.read_mode)
    }

    /// Loads a snapshot of the journal at `path` without writing to it.
    ///
    /// Waits for any writer to finish, then replays the journal under a
    /// shared lock. The file is never created, truncated or locked for
    /// writing, so read permission is enough. In permissive mode a torn tail
    /// is left in place and ignored.
    pub fn open_read_only<P: AsRef<Path>>(
        path: P,
        read_mode: ReadMode,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let reader = JournalReader::open_shared(path, read_mode).map_err(journal_error)?;
        let replay = Replay::read(path, reader)?;
        if replay.torn_tail {
            warn!(path = %path.display(), offset = replay.len, "ignoring torn trailing frame");
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer: None,
            index: replay.index,
            latest: replay.latest,
            len: replay.len,
        })
    }

    fn with_writer(
        path: &Path,
        mut writer: JournalWriter,
        read_mode: ReadMode,
    ) -> Result<Self, StoreError> {
        let reader = JournalReader::open(path, read_mode).map_err(journal_error)?;
        let replay = Replay::read(path, reader)?;
        if replay.torn_tail {
            warn!(path = %path.display(), offset = replay.len, "dropping torn trailing frame");
            writer.truncate_to(replay.len).map_err(journal_error)?;
        }

        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(writer),
            index: replay.index,
            latest: replay.latest,
            len: replay.len,
        })
    }

    /// Path of the backing journal.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the store was opened with [`open_read_only`](Self::open_read_only).
    pub fn is_read_only(&self) -> bool {
        self.writer.is_none()
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        match self.writer {
            Some(writer) => writer.finish().map_err(journal_error),
            None => Ok(()),
        }
    }
}

impl AttestationStore for JournalStore {
    fn get(&self, fingerprint: &Fingerprint) -> Result<Option<AttestationRecord>, StoreError> {
        Ok(self.index.get(fingerprint).copied())
    }

    fn insert_if_absent(
        &mut self,
        fingerprint: Fingerprint,
        record: AttestationRecord,
    ) -> Result<InsertOutcome, StoreError> {
        if let Some(existing) = self.index.get(&fingerprint) {
            return Ok(InsertOutcome::Occupied(*existing));
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(StoreError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "journal store opened read-only",
            )));
        };

        let entry = JournalEntry::new(fingerprint, record);
        if let Err(err) = writer.append_entry(&entry) {
            // Drop whatever part of the frame reached the file.
            if let Err(cleanup) = writer.truncate_to(self.len) {
                warn!(
                    path = %self.path.display(),
                    error = %cleanup,
                    "failed to roll back partial frame"
                );
            }
            return Err(journal_error(err));
        }

        self.len += (FRAME_HEADER_SIZE + JournalEntry::PAYLOAD_LEN) as u64;
        self.index.insert(fingerprint, record);
        self.latest = self.latest.max(Some(record.attested_at));
        Ok(InsertOutcome::Inserted)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn latest_attested_at(&self) -> Option<LogicalTime> {
        self.latest
    }
}

impl std::fmt::Debug for JournalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JournalStore")
            .field("path", &self.path)
            .field("records", &self.index.len())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}
