//! Journal writer implementation.

use crate::entry::JournalEntry;
use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, MAX_PAYLOAD_SIZE};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use tracing::debug;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
    /// Whether to keep existing frames (default: true).
    pub append: bool,
    /// Whether to wait for another writer to release the journal instead of
    /// failing with [`JournalError::Locked`] (default: false).
    pub wait_for_lock: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
            wait_for_lock: false,
        }
    }
}

/// Journal writer for append-only attestation storage.
///
/// Each accepted attestation becomes one frame. A frame header and its
/// payload are written with a single `write_all`, so a crash leaves at most
/// one torn frame at the tail.
///
/// A writer opened with [`open`](Self::open) holds an exclusive advisory
/// lock on the journal until it is dropped, so at most one writer per file
/// exists across processes. The file is opened in append mode, so every
/// frame lands at the current end of file.
///
/// # See Also
///
/// - [`JournalReader`](crate::JournalReader) - Read entries back
pub struct JournalWriter {
    file: File,
    sync: bool,
    header_written: bool,
}

impl JournalWriter {
    /// Opens or creates a journal file for writing and locks it.
    ///
    /// If the file is empty a header is written. If it already holds a valid
    /// header the existing frames are kept (`options.append`) or the file is
    /// cut back to just the header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - File cannot be opened/created
    /// - Another writer holds the journal and `options.wait_for_lock` is off
    /// - Existing file is not a valid journal
    /// - File is not empty but too small to be valid
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .append(true)
            .open(path)?;

        if options.wait_for_lock {
            FileExt::lock_exclusive(&file)?;
        } else if let Err(err) = FileExt::try_lock_exclusive(&file) {
            if err.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(JournalError::Locked {
                    path: path.to_path_buf(),
                });
            }
            return Err(err.into());
        }
        debug!(path = %path.display(), "journal locked for writing");

        Self::from_file(file, options)
    }

    /// Wraps an already opened journal file.
    ///
    /// Takes no lock: the caller is responsible for being the only writer.
    /// Validates or writes the header exactly like [`open`](Self::open).
    pub fn from_file(file: File, options: WriteOptions) -> Result<Self, JournalError> {
        let mut writer = Self {
            file,
            sync: options.sync,
            header_written: false,
        };

        let len = writer.file.metadata()?.len();
        if len == 0 {
            writer.write_header()?;
        } else if len < JournalHeader::HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header_bytes = [0u8; JournalHeader::HEADER_SIZE];
            writer.file.seek(io::SeekFrom::Start(0))?;
            writer.file.read_exact(&mut header_bytes)?;
            JournalHeader::from_bytes(&header_bytes)?;
            writer.header_written = true;
            if options.append {
                writer.file.seek(io::SeekFrom::End(0))?;
            } else {
                writer.truncate_to(JournalHeader::HEADER_SIZE as u64)?;
            }
        }

        Ok(writer)
    }

    fn write_header(&mut self) -> Result<(), JournalError> {
        let header = JournalHeader::new();
        self.file.write_all(&header.to_bytes())?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        self.header_written = true;
        Ok(())
    }

    /// Appends one attestation entry as an `Attestation` frame.
    pub fn append_entry(&mut self, entry: &JournalEntry) -> Result<(), JournalError> {
        self.append_raw(FrameKind::Attestation, &entry.to_payload())
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        if !self.header_written {
            return Err(JournalError::InvalidHeader(
                "header not written".to_string(),
            ));
        }

        let len = u32::try_from(payload.len()).map_err(|_| JournalError::PayloadTooLarge {
            size: u32::MAX,
            max: MAX_PAYLOAD_SIZE,
        })?;
        let frame = RecordFrame::new(kind, len)?;

        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        buf.extend_from_slice(&frame.to_bytes());
        buf.extend_from_slice(payload);

        self.file.write_all(&buf)?;
        self.file.flush()?;

        if self.sync {
            self.file.sync_all()?;
        }

        Ok(())
    }

    /// Cuts the journal back to `len` bytes and positions the writer there.
    ///
    /// Used to drop a torn trailing frame before appending. `len` must not be
    /// smaller than the header.
    pub fn truncate_to(&mut self, len: u64) -> Result<(), JournalError> {
        if len < JournalHeader::HEADER_SIZE as u64 {
            return Err(JournalError::InvalidHeader(format!(
                "cannot truncate below header: {} bytes",
                len
            )));
        }
        self.file.set_len(len)?;
        self.file.seek(io::SeekFrom::Start(len))?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Finishes writing and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
