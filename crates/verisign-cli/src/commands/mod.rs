//! Subcommand implementations.

pub mod attest;
pub mod check;
pub mod hash;
pub mod keygen;
pub mod lookup;

use std::path::PathBuf;

use verisign_registry::Fingerprint;

use crate::error::CliError;

/// Resolves the content named on the command line: either a file to hash
/// or an explicit `--fingerprint`, never both.
pub fn content_fingerprint(
    input: Option<PathBuf>,
    fingerprint: Option<String>,
) -> Result<Fingerprint, CliError> {
    match (input, fingerprint) {
        (Some(path), None) => hash::fingerprint_file(&path),
        (None, Some(hex)) => Ok(Fingerprint::parse_hex(hex.trim())?),
        _ => Err(CliError::Config(
            "exactly one of <INPUT> or --fingerprint is required".to_string(),
        )),
    }
}
