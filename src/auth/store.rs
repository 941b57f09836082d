//! Storage seams for the credential secret and the last-validated timestamp.
//!
//! The secret lives in sealed storage (the OS keyring in production); the
//! timestamp is plain key/value state in a small TOML file. Both sit behind
//! traits so the auth manager can be tested against in-memory stores.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::error::{AuthError, Result};

/// The keyring service name for SideJira secrets.
const KEYRING_SERVICE: &str = "sidejira";

/// Sealed key/value storage for the credential secret.
pub trait SecretStore: Send + Sync {
    /// Read a secret, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a secret, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<()>;
    /// Delete a secret; deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}

/// Plain key/value storage for non-secret lifecycle state.
pub trait StateStore: Send + Sync {
    /// Read a value, `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    /// Set or remove a value.
    fn update(&self, key: &str, value: Option<&str>) -> Result<()>;
}

/// Secret store backed by the OS keyring.
#[derive(Debug)]
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    /// Create a store under the default service name.
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, key)
            .map_err(|e| AuthError::Storage(format!("failed to access keyring: {}", e)))
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::Storage(format!(
                "failed to read secret: {}",
                e
            ))),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|e| AuthError::Storage(format!("failed to store secret: {}", e)))
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AuthError::Storage(format!(
                "failed to delete secret: {}",
                e
            ))),
        }
    }
}

/// State store backed by a TOML file of string pairs.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store at the given file path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| toml::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuthError::Storage(format!("failed to create state dir: {}", e)))?;
        }
        let raw = toml::to_string(entries)
            .map_err(|e| AuthError::Storage(format!("failed to serialize state: {}", e)))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| AuthError::Storage(format!("failed to write state: {}", e)))
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().get(key).cloned()
    }

    fn update(&self, key: &str, value: Option<&str>) -> Result<()> {
        let mut entries = self.read_all();
        match value {
            Some(v) => {
                entries.insert(key.to_string(), v.to_string());
            }
            None => {
                entries.remove(key);
            }
        }
        self.write_all(&entries)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{MemorySecretStore, MemoryStateStore};
    use super::*;

    #[test]
    fn test_file_state_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.toml"));

        assert!(store.get("lastValidatedAt").is_none());
        store.update("lastValidatedAt", Some("1700000000000")).unwrap();
        assert_eq!(
            store.get("lastValidatedAt").as_deref(),
            Some("1700000000000")
        );

        store.update("lastValidatedAt", None).unwrap();
        assert!(store.get("lastValidatedAt").is_none());
    }

    #[test]
    fn test_file_state_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested").join("state.toml"));
        store.update("k", Some("v")).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_state_store_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("state.toml"));
        store.update("a", Some("1")).unwrap();
        store.update("b", Some("2")).unwrap();
        store.update("a", None).unwrap();
        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }

    #[test]
    fn test_memory_secret_store_replaces_value() {
        let store = MemorySecretStore::default();
        store.store("creds", "first").unwrap();
        store.store("creds", "second").unwrap();
        assert_eq!(store.get("creds").unwrap().as_deref(), Some("second"));

        store.delete("creds").unwrap();
        assert!(store.get("creds").unwrap().is_none());
    }

    #[test]
    fn test_memory_state_store_update() {
        let store = MemoryStateStore::default();
        store.update("k", Some("v")).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));
        store.update("k", None).unwrap();
        assert!(store.get("k").is_none());
    }
}
