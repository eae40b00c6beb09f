//! Attest command implementation.

use std::path::PathBuf;

use tracing::warn;
use verisign_ledger::{Ledger, LedgerError, SignedAttestRequest, SystemClock};
use verisign_registry::{AttestationRecord, Fingerprint, StoreError};
use verisign_store::{JournalStore, StoreOptions};

use crate::error::CliError;
use crate::keyfile;
use crate::output::{self, RecordView};

pub fn run(
    fingerprint: Fingerprint,
    key: PathBuf,
    registry: PathBuf,
    options: StoreOptions,
    json_output: bool,
) -> Result<(), CliError> {
    let signing_key = keyfile::load(&key)?;
    let request = SignedAttestRequest::sign(&signing_key, fingerprint);

    let store = JournalStore::open(&registry, options)?;
    let ledger = Ledger::new(store, SystemClock);
    let submitted = ledger.submit(&request);
    let closed = ledger.into_registry().into_store().finish();

    match settle(fingerprint, submitted, closed) {
        Ok(record) => {
            print_record(fingerprint, &record, json_output);
            Ok(())
        }
        Err(err) => {
            // A committed record is reported even when closing failed.
            if let CliError::CommittedUnflushed { record, .. } = &err {
                print_record(fingerprint, record, json_output);
            }
            Err(err)
        }
    }
}

/// Combines the ledger outcome with the result of closing the journal.
///
/// The ledger outcome decides success; a close failure after a commit is
/// reported as [`CliError::CommittedUnflushed`], never as a plain failure.
fn settle(
    fingerprint: Fingerprint,
    submitted: Result<AttestationRecord, LedgerError>,
    closed: Result<(), StoreError>,
) -> Result<AttestationRecord, CliError> {
    match (submitted, closed) {
        (Ok(record), Ok(())) => Ok(record),
        (Ok(record), Err(source)) => Err(CliError::CommittedUnflushed {
            fingerprint,
            record,
            source,
        }),
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                warn!(%fingerprint, error = %close_err, "failed to close journal");
            }
            Err(err.into())
        }
    }
}

fn print_record(fingerprint: Fingerprint, record: &AttestationRecord, json_output: bool) {
    if json_output {
        println!("{}", output::format_json(&RecordView::new(fingerprint, record)));
    } else {
        output::print_table_header();
        println!("{}", output::format_table_row(&fingerprint, record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use verisign_registry::{CreatorId, LogicalTime, RegistryError};

    fn fingerprint() -> Fingerprint {
        Fingerprint::new([7; 32])
    }

    fn record() -> AttestationRecord {
        AttestationRecord::new(CreatorId::new([1; 32]), LogicalTime::from_secs(60))
    }

    fn close_failure() -> StoreError {
        StoreError::Io(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    #[test]
    fn close_failure_after_commit_keeps_the_record() {
        let err = settle(fingerprint(), Ok(record()), Err(close_failure())).unwrap_err();

        match &err {
            CliError::CommittedUnflushed { record: kept, .. } => assert_eq!(*kept, record()),
            other => panic!("expected CommittedUnflushed, got {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("was committed"));
        assert!(message.contains(&fingerprint().to_string()));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn rejection_wins_over_close_failure() {
        let duplicate = LedgerError::from(RegistryError::DuplicateAttestation {
            fingerprint: fingerprint(),
        });
        let err = settle(fingerprint(), Err(duplicate), Err(close_failure())).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DUPLICATE);
    }

    #[test]
    fn clean_commit_returns_record() {
        assert_eq!(settle(fingerprint(), Ok(record()), Ok(())).unwrap(), record());
    }
}
