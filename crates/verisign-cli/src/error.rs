//! CLI error type and exit codes.

use std::path::PathBuf;

use thiserror::Error;
use verisign_journal::JournalError;
use verisign_ledger::LedgerError;
use verisign_registry::{AttestationRecord, Fingerprint, FingerprintError, StoreError};

/// Exit code for a rejected duplicate attestation.
pub const EXIT_DUPLICATE: i32 = 2;

/// Errors surfaced by `verisign` subcommands.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid or missing configuration.
    #[error("{0}")]
    Config(String),
    /// Key file missing, unreadable or malformed.
    #[error("invalid key file {path}: {reason}")]
    KeyFile {
        /// Key file path as given.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },
    /// Fingerprint argument is not 32 bytes of hex.
    #[error("invalid fingerprint: {0}")]
    Fingerprint(#[from] FingerprintError),
    /// The ledger rejected the request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// The registry store failed.
    #[error("registry store error: {0}")]
    Store(#[from] StoreError),
    /// The journal could not be read.
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON encoding or decoding failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The attestation was accepted and appended, but closing the journal
    /// failed, so its durability is unconfirmed.
    #[error(
        "{fingerprint} was committed by {} at {}, but closing the journal failed: {source}",
        .record.creator,
        .record.attested_at
    )]
    CommittedUnflushed {
        /// Attested fingerprint.
        fingerprint: Fingerprint,
        /// The committed record.
        record: AttestationRecord,
        /// Why closing failed.
        source: StoreError,
    },
    /// Lookup found no record.
    #[error("no attestation found for {0}")]
    NotFound(String),
    /// `check --strict` found invariant violations.
    #[error("journal check failed: {0} violation(s)")]
    CheckFailed(usize),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Ledger(err) if err.is_duplicate() => EXIT_DUPLICATE,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verisign_registry::RegistryError;

    #[test]
    fn duplicate_exits_with_two() {
        let err = CliError::from(LedgerError::from(RegistryError::DuplicateAttestation {
            fingerprint: Fingerprint::new([1; 32]),
        }));
        assert_eq!(err.exit_code(), EXIT_DUPLICATE);
        assert!(err.to_string().contains("content already attested"));
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(CliError::NotFound("0x00".into()).exit_code(), 1);
        assert_eq!(CliError::Config("x".into()).exit_code(), 1);
    }
}
