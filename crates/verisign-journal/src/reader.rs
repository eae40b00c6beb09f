//! Journal reader implementation.

use crate::entry::JournalEntry;
use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame};
use fs2::FileExt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Strict mode: truncated frames are errors.
    Strict,
    /// Permissive mode: truncation is treated as end-of-file.
    Permissive,
}

/// Journal reader for reading attestation entries from a journal file.
///
/// The reader supports two modes:
/// - [`ReadMode::Strict`] - Truncated frames are errors
/// - [`ReadMode::Permissive`] - Truncation is treated as end-of-file
///
/// [`position`](Self::position) always points just past the last complete
/// frame, so after a permissive read hits a torn tail it is the length the
/// file should be cut back to.
pub struct JournalReader {
    reader: BufReader<File>,
    mode: ReadMode,
    position: u64,
    file_len: u64,
}

impl JournalReader {
    /// Opens a journal file for reading.
    ///
    /// The file header is validated and the reader is positioned at the first
    /// record frame after the header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - File cannot be opened
    /// - File header is invalid
    /// - I/O error occurs
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        Self::from_file(File::open(path)?, mode)
    }

    /// Opens a journal for reading under a shared lock.
    ///
    /// Waits until no writer holds the journal, then keeps writers out until
    /// the reader is dropped, so the reader sees only complete frames. Needs
    /// read permission only.
    ///
    /// Blocks while any writer is open, including one owned by this process.
    pub fn open_shared<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let file = File::open(path)?;
        FileExt::lock_shared(&file)?;
        Self::from_file(file, mode)
    }

    fn from_file(mut file: File, mode: ReadMode) -> Result<Self, JournalError> {
        let file_len = file.metadata()?.len();
        Self::read_header(&mut file)?;

        Ok(Self {
            reader: BufReader::new(file),
            mode,
            position: JournalHeader::HEADER_SIZE as u64,
            file_len,
        })
    }

    fn read_header(file: &mut File) -> Result<JournalHeader, JournalError> {
        file.seek(io::SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; JournalHeader::HEADER_SIZE];
        file.read_exact(&mut header_bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                JournalError::InvalidHeader("file shorter than header".to_string())
            } else {
                e.into()
            }
        })?;
        JournalHeader::from_bytes(&header_bytes)
    }

    /// Returns the offset just past the last complete frame read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns true if bytes remain after [`position`](Self::position).
    pub fn has_trailing_bytes(&self) -> bool {
        self.position < self.file_len
    }

    fn truncated(&self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        match self.mode {
            ReadMode::Permissive => Ok(None),
            ReadMode::Strict => Err(JournalError::TruncatedFrame {
                offset: self.position,
            }),
        }
    }

    /// Reads the next frame from the journal.
    ///
    /// Returns `Ok(None)` when end-of-file is reached (or truncation in permissive mode).
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.position >= self.file_len {
            return Ok(None);
        }

        let mut frame_header_bytes = [0u8; RecordFrame::FRAME_HEADER_SIZE];
        match self.reader.read_exact(&mut frame_header_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(),
            Err(e) => return Err(e.into()),
        }

        let frame = RecordFrame::from_bytes(&frame_header_bytes, self.position)?;

        let mut payload = vec![0u8; frame.len as usize];
        match self.reader.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(),
            Err(e) => return Err(e.into()),
        }

        self.position += RecordFrame::FRAME_HEADER_SIZE as u64 + frame.len as u64;

        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next attestation entry from the journal.
    ///
    /// Skips unknown frame kinds and returns `Ok(None)` at end-of-file.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - Frame structure is invalid
    /// - An attestation payload has the wrong length
    /// - Truncation detected (in strict mode)
    /// - I/O error occurs
    pub fn read_entry(&mut self) -> Result<Option<JournalEntry>, JournalError> {
        loop {
            let offset = self.position;
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Attestation, payload)) => {
                    let entry = JournalEntry::from_payload(&payload).ok_or(
                        JournalError::InvalidEntry {
                            offset,
                            expected: JournalEntry::PAYLOAD_LEN,
                            actual: payload.len(),
                        },
                    )?;
                    return Ok(Some(entry));
                }
                Some((FrameKind::Unknown(kind), _)) => {
                    tracing::debug!(offset, kind, "skipping unknown frame kind");
                    continue;
                }
            }
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<JournalEntry, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_entry().transpose()
    }
}
