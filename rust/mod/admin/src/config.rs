//! Session configuration.
//!
//! Reads `~/.imall/config.toml`:
//!
//! ```toml
//! storage = "redb"          # or "memory"
//! db_path = "/var/lib/imall/session.redb"
//! key_prefix = ""
//! persist = true
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use imall_kv::{KVStore, MemoryKV, RedbStore};
use imall_state::{KvPersister, NoopPersister, Persister};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;

/// Where persisted session state lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local; gone when the process exits.
    Memory,
    /// redb file at `db_path`.
    #[default]
    Redb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub storage: StorageKind,

    /// redb file. Defaults to `~/.imall/session.redb`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,

    /// Prepended to every store id to form the storage key.
    pub key_prefix: String,

    /// When false, stores live in memory only and nothing is loaded.
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            db_path: None,
            key_prefix: String::new(),
            persist: true,
        }
    }
}

impl SessionConfig {
    /// Default config file path: ~/.imall/config.toml.
    pub fn default_path() -> PathBuf {
        imall_dir().join("config.toml")
    }

    /// Config for a session that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageKind::Memory,
            ..Self::default()
        }
    }

    /// Load config from disk, or return the default if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            debug!("config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let config_err = |message: String| SessionError::Config {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        toml::from_str(&content).map_err(|e| config_err(e.to_string()))
    }

    /// Save config to disk.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let config_err = |message: String| SessionError::Config {
            path: path.to_path_buf(),
            message,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| config_err(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| config_err(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| config_err(e.to_string()))
    }

    /// The redb file this config points at.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| imall_dir().join("session.redb"))
    }

    /// Build the persister session stores write through.
    pub fn persister(&self) -> Result<Arc<dyn Persister>, SessionError> {
        if !self.persist {
            return Ok(Arc::new(NoopPersister));
        }
        let kv: Arc<dyn KVStore> = match self.storage {
            StorageKind::Memory => Arc::new(MemoryKV::new()),
            StorageKind::Redb => Arc::new(RedbStore::open(&self.resolved_db_path())?),
        };
        Ok(Arc::new(KvPersister::with_prefix(kv, self.key_prefix.clone())))
    }
}

/// Return the I-Mall config directory (~/.imall).
fn imall_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".imall")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.storage, StorageKind::Redb);
        assert!(config.persist);
        assert!(config.key_prefix.is_empty());
        assert!(config.resolved_db_path().ends_with(".imall/session.redb"));
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_parse_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "storage = \"memory\"\nkey_prefix = \"imall:\"\n").unwrap();

        let config = SessionConfig::load(&path).unwrap();
        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.key_prefix, "imall:");
        assert!(config.persist);
        assert!(config.db_path.is_none());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "storage = \"floppy\"").unwrap();

        let err = SessionConfig::load(&path).unwrap_err();
        assert!(matches!(err, SessionError::Config { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = SessionConfig {
            db_path: Some(dir.path().join("s.redb")),
            persist: false,
            ..SessionConfig::default()
        };
        config.save(&path).unwrap();

        assert_eq!(SessionConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_prefix_applies_to_persister() {
        let config = SessionConfig {
            key_prefix: "imall:".into(),
            ..SessionConfig::in_memory()
        };
        let persister = config.persister().unwrap();
        persister.save("JWT", b"{}").unwrap();
        assert_eq!(persister.load("JWT").unwrap(), Some(b"{}".to_vec()));
    }
}
