//! Path checks shared by subcommands.

use std::path::Path;

use crate::error::CliError;

/// Fails unless `path` names an existing regular file.
///
/// Read-only commands use this so that opening a store never creates an
/// empty registry as a side effect of a typo.
pub fn require_existing_file(path: &Path, what: &str) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::Config(format!("{} not found: {}", what, path.display())));
    }
    if !path.is_file() {
        return Err(CliError::Config(format!("{} is not a file: {}", what, path.display())));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_missing_and_directories() {
        let dir = TempDir::new().unwrap();
        assert!(require_existing_file(&dir.path().join("nope"), "registry").is_err());
        assert!(require_existing_file(dir.path(), "registry").is_err());

        let file = dir.path().join("r.vsj");
        std::fs::write(&file, b"").unwrap();
        assert!(require_existing_file(&file, "registry").is_ok());
    }
}
