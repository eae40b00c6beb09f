//! Offline invariant checks over a journal.

use crate::errors::JournalError;
use crate::reader::{JournalReader, ReadMode};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use verisign_registry::{Fingerprint, LogicalTime};

/// An entry whose commit time is earlier than the entry before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRegression {
    /// Zero-based index of the offending entry.
    pub index: u64,
    /// Fingerprint of the offending entry.
    pub fingerprint: Fingerprint,
    /// Time of the preceding entry.
    pub previous: LogicalTime,
    /// Time of the offending entry.
    pub attested_at: LogicalTime,
}

/// Result of [`verify_journal`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JournalReport {
    /// Number of attestation entries read.
    pub entries: u64,
    /// Fingerprints that appear more than once (write-once violations).
    pub duplicates: Vec<Fingerprint>,
    /// Entries whose commit time goes backwards.
    pub time_regressions: Vec<TimeRegression>,
    /// Whether a torn frame follows the last complete one (permissive mode only).
    pub torn_tail: bool,
}

impl JournalReport {
    /// Returns true if no invariant violation was found.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.time_regressions.is_empty() && !self.torn_tail
    }
}

/// Scans every entry of a journal and checks the registry invariants:
/// each fingerprint appears at most once and commit times never decrease.
///
/// Structural errors (bad header, bad frame, truncation in strict mode) are
/// returned as `Err`; invariant violations are collected in the report.
pub fn verify_journal<P: AsRef<Path>>(
    path: P,
    mode: ReadMode,
) -> Result<JournalReport, JournalError> {
    let mut reader = JournalReader::open(path, mode)?;
    let mut report = JournalReport::default();
    let mut seen = HashSet::new();
    let mut previous: Option<LogicalTime> = None;

    while let Some(entry) = reader.read_entry()? {
        if !seen.insert(entry.fingerprint) {
            report.duplicates.push(entry.fingerprint);
        }
        let attested_at = entry.record.attested_at;
        if let Some(prev) = previous {
            if attested_at < prev {
                report.time_regressions.push(TimeRegression {
                    index: report.entries,
                    fingerprint: entry.fingerprint,
                    previous: prev,
                    attested_at,
                });
            }
        }
        previous = Some(previous.map_or(attested_at, |p| p.max(attested_at)));
        report.entries += 1;
    }

    report.torn_tail = reader.has_trailing_bytes();
    Ok(report)
}
