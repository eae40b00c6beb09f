//! Keygen command implementation.

use std::path::PathBuf;

use tracing::info;

use crate::error::CliError;
use crate::keyfile;

pub fn run(out: PathBuf, force: bool) -> Result<(), CliError> {
    let key = keyfile::generate();
    keyfile::save(&key, &out, force)?;

    let creator = keyfile::creator_of(&key);
    info!(path = %out.display(), %creator, "signing key written");
    println!("{}", creator);
    Ok(())
}
