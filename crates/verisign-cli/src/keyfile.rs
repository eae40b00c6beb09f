//! Signing key files.
//!
//! A key file is JSON holding the hex-encoded ed25519 secret key and, for
//! convenience, the creator id it authenticates as.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use ed25519_dalek::{SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use verisign_registry::CreatorId;

use crate::error::CliError;

#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    secret_key: String,
    creator: CreatorId,
}

/// Creator id proven by signatures from `key`.
pub fn creator_of(key: &SigningKey) -> CreatorId {
    CreatorId::new(key.verifying_key().to_bytes())
}

/// Generates a fresh key from the OS RNG.
pub fn generate() -> SigningKey {
    let mut secret = [0u8; SECRET_KEY_LENGTH];
    OsRng.fill_bytes(&mut secret);
    SigningKey::from_bytes(&secret)
}

/// Writes `key` to `path`. Refuses to replace an existing file unless
/// `overwrite` is set.
pub fn save(key: &SigningKey, path: &Path, overwrite: bool) -> Result<(), CliError> {
    let contents = serde_json::to_string_pretty(&KeyFile {
        secret_key: hex::encode(key.to_bytes()),
        creator: creator_of(key),
    })?;

    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| CliError::KeyFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    file.write_all(contents.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Reads a key file written by [`save`].
pub fn load(path: &Path) -> Result<SigningKey, CliError> {
    let invalid = |reason: String| CliError::KeyFile {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let file: KeyFile = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;

    let bytes = hex::decode(file.secret_key.trim()).map_err(|e| invalid(e.to_string()))?;
    let secret: [u8; SECRET_KEY_LENGTH] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| invalid(format!("secret key is {} bytes", b.len())))?;
    let key = SigningKey::from_bytes(&secret);

    if creator_of(&key) != file.creator {
        return Err(invalid("creator does not match secret key".to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_then_load_same_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.key");
        let key = generate();

        save(&key, &path, false).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.to_bytes(), key.to_bytes());
    }

    #[test]
    fn save_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.key");
        save(&generate(), &path, false).unwrap();

        assert!(matches!(
            save(&generate(), &path, false),
            Err(CliError::KeyFile { .. })
        ));
        assert!(save(&generate(), &path, true).is_ok());
    }

    #[test]
    fn load_rejects_mismatched_creator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tampered.key");
        let key = SigningKey::from_bytes(&[1; 32]);
        let other = SigningKey::from_bytes(&[2; 32]);
        let body = serde_json::json!({
            "secret_key": hex::encode(key.to_bytes()),
            "creator": creator_of(&other).to_string(),
        });
        fs::write(&path, body.to_string()).unwrap();

        assert!(matches!(load(&path), Err(CliError::KeyFile { .. })));
    }
}
