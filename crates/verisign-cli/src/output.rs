//! Output formatting utilities.

use chrono::DateTime;
use serde::Serialize;
use verisign_registry::{AttestationRecord, Fingerprint, LogicalTime};

/// JSON view of one attestation.
#[derive(Debug, Serialize)]
pub struct RecordView {
    /// Attested fingerprint.
    pub fingerprint: Fingerprint,
    /// Full creator id.
    pub creator: String,
    /// Commit time in seconds.
    pub attested_at: u64,
    /// Commit time rendered in UTC.
    pub attested_at_utc: String,
}

impl RecordView {
    /// Builds the view for `record` stored under `fingerprint`.
    pub fn new(fingerprint: Fingerprint, record: &AttestationRecord) -> Self {
        Self {
            fingerprint,
            creator: record.creator.to_string(),
            attested_at: record.attested_at.as_secs(),
            attested_at_utc: format_time(record.attested_at),
        }
    }
}

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Renders a logical time as `YYYY-MM-DD HH:MM:SS UTC`.
///
/// Times outside chrono's range fall back to raw seconds.
pub fn format_time(time: LogicalTime) -> String {
    i64::try_from(time.as_secs())
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("{}s", time.as_secs()))
}

/// Formats an attestation as a table row.
pub fn format_table_row(fingerprint: &Fingerprint, record: &AttestationRecord) -> String {
    format!(
        "{:<20} {:<16} {}",
        truncate(&fingerprint.to_string(), 20),
        record.creator.short(),
        format_time(record.attested_at)
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<20} {:<16} {}", "FINGERPRINT", "CREATOR", "ATTESTED_AT");
    println!("{}", "-".repeat(60));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}
