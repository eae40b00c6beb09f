//! Hash command implementation.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use verisign_registry::Fingerprint;

use crate::error::CliError;

/// SHA-256 of the file at `path`.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, CliError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(Fingerprint::new(hasher.finalize().into()))
}

pub fn run(file: PathBuf) -> Result<(), CliError> {
    println!("{}", fingerprint_file(&file)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn hashes_file_contents() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let fingerprint = fingerprint_file(file.path()).unwrap();
        assert_eq!(
            fingerprint.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
