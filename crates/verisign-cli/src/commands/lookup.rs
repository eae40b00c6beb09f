//! Lookup command implementation.

use std::path::PathBuf;

use verisign_journal::ReadMode;
use verisign_ledger::{Ledger, SystemClock};
use verisign_registry::Fingerprint;
use verisign_store::JournalStore;

use crate::error::CliError;
use crate::output::{self, RecordView};
use crate::path::require_existing_file;

pub fn run(
    fingerprint: Fingerprint,
    registry: PathBuf,
    mode: ReadMode,
    json_output: bool,
) -> Result<(), CliError> {
    require_existing_file(&registry, "registry")?;

    let store = JournalStore::open_read_only(&registry, mode)?;
    let ledger = Ledger::new(store, SystemClock);

    let Some(record) = ledger.lookup(&fingerprint)? else {
        return Err(CliError::NotFound(fingerprint.to_string()));
    };

    if json_output {
        println!("{}", output::format_json(&RecordView::new(fingerprint, &record)));
    } else {
        output::print_table_header();
        println!("{}", output::format_table_row(&fingerprint, &record));
    }
    Ok(())
}
