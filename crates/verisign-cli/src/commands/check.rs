//! Check command implementation.

use std::path::PathBuf;

use verisign_journal::{verify_journal, JournalReport, ReadMode};

use crate::error::CliError;
use crate::output;
use crate::path::require_existing_file;

pub fn run(
    registry: PathBuf,
    mode: ReadMode,
    strict: bool,
    json_output: bool,
) -> Result<(), CliError> {
    require_existing_file(&registry, "registry")?;
    let report = verify_journal(&registry, mode)?;

    if json_output {
        println!("{}", output::format_json(&report));
    } else {
        print_report(&report);
    }

    if strict && !report.is_clean() {
        return Err(CliError::CheckFailed(violations(&report)));
    }
    Ok(())
}

fn violations(report: &JournalReport) -> usize {
    report.duplicates.len() + report.time_regressions.len() + usize::from(report.torn_tail)
}

fn print_report(report: &JournalReport) {
    println!("entries:          {}", report.entries);
    println!("duplicates:       {}", report.duplicates.len());
    println!("time regressions: {}", report.time_regressions.len());
    println!("torn tail:        {}", if report.torn_tail { "yes" } else { "no" });

    for fingerprint in &report.duplicates {
        println!("  duplicate {}", fingerprint);
    }
    for regression in &report.time_regressions {
        println!(
            "  entry {} ({}) at {} precedes {}",
            regression.index,
            regression.fingerprint,
            output::format_time(regression.attested_at),
            output::format_time(regression.previous)
        );
    }

    let status = if report.is_clean() { "OK" } else { "VIOLATIONS" };
    println!("status:           {}", status);
}
