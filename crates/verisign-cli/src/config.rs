//! Layered configuration: flag > environment > config file > default.
//!
//! Flags and environment variables are resolved by clap before values reach
//! this module; the JSON config file fills whatever is still unset.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use verisign_journal::ReadMode;
use verisign_store::StoreOptions;

use crate::error::CliError;

/// Log filter used when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Contents of a `--config` / `VERISIGN_CONFIG` file.
///
/// ```json
/// { "registry": "registry.vsj", "key": "alice.key", "sync": true,
///   "permissive": false, "log_level": "info" }
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Registry journal path.
    pub registry: Option<PathBuf>,
    /// Signing key file path.
    pub key: Option<PathBuf>,
    /// Fsync after each accepted write.
    pub sync: Option<bool>,
    /// Tolerate a torn trailing frame.
    pub permissive: Option<bool>,
    /// Tracing filter directive.
    pub log_level: Option<String>,
}

impl Config {
    /// Loads the config file at `path`, or an empty config if none is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| CliError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Registry path from the flag, else the file.
    pub fn registry(&self, flag: Option<PathBuf>) -> Result<PathBuf, CliError> {
        flag.or_else(|| self.registry.clone()).ok_or_else(|| {
            CliError::Config(
                "no registry configured (use --registry or VERISIGN_REGISTRY)".to_string(),
            )
        })
    }

    /// Key path from the flag, else the file.
    pub fn key(&self, flag: Option<PathBuf>) -> Result<PathBuf, CliError> {
        flag.or_else(|| self.key.clone()).ok_or_else(|| {
            CliError::Config("no signing key configured (use --key or VERISIGN_KEY)".to_string())
        })
    }

    /// Store options from the flags, else the file.
    ///
    /// Concurrent invocations on one registry queue on the journal lock.
    pub fn store_options(&self, sync: bool, permissive: bool) -> StoreOptions {
        StoreOptions {
            sync: sync || self.sync.unwrap_or(false),
            read_mode: self.read_mode(permissive),
            wait_for_lock: true,
        }
    }

    /// Read mode from the flag, else the file.
    pub fn read_mode(&self, permissive: bool) -> ReadMode {
        if permissive || self.permissive.unwrap_or(false) {
            ReadMode::Permissive
        } else {
            ReadMode::Strict
        }
    }

    /// Log filter from the flag, else the file, else [`DEFAULT_LOG_LEVEL`].
    pub fn log_level(&self, flag: Option<String>) -> String {
        flag.or_else(|| self.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_config() -> Config {
        Config {
            registry: Some(PathBuf::from("from-file.vsj")),
            key: None,
            sync: Some(true),
            permissive: None,
            log_level: Some("debug".to_string()),
        }
    }

    #[test]
    fn flag_overrides_file() {
        let config = file_config();
        let flag = Some(PathBuf::from("from-flag.vsj"));
        assert_eq!(config.registry(flag).unwrap(), PathBuf::from("from-flag.vsj"));
        assert_eq!(config.registry(None).unwrap(), PathBuf::from("from-file.vsj"));
        assert_eq!(config.log_level(Some("trace".into())), "trace");
        assert_eq!(config.log_level(None), "debug");
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::default();
        assert!(config.registry(None).is_err());
        assert!(config.key(None).is_err());
        assert_eq!(config.log_level(None), DEFAULT_LOG_LEVEL);
        let options = config.store_options(false, false);
        assert!(!options.sync);
        assert_eq!(options.read_mode, ReadMode::Strict);
        assert!(options.wait_for_lock);
    }

    #[test]
    fn file_sync_is_honoured() {
        assert!(file_config().store_options(false, false).sync);
        assert_eq!(file_config().read_mode(true), ReadMode::Permissive);
    }

    #[test]
    fn load_rejects_unknown_fields() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"registry": "r.vsj", "colour": "blue"}}"#).unwrap();
        assert!(matches!(
            Config::load(Some(file.path())),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn load_reads_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"registry": "r.vsj", "permissive": true}}"#).unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.registry, Some(PathBuf::from("r.vsj")));
        assert_eq!(config.read_mode(false), ReadMode::Permissive);
    }
}
