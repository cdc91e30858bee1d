//! Credential persistence.
//!
//! Account tokens are keyed by consumer key so several API keys can keep
//! separate accounts side by side. The consumer secret is never written;
//! it comes from the environment. The client never loads from a store on
//! its own; callers decide when to call
//! [`CioClient::restore_credentials`](crate::client::CioClient::restore_credentials).

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::credentials::StoredTokens;
use crate::error::{ClientError, Result};
use crate::oauth::percent_encode;

/// Somewhere to keep account tokens between runs.
pub trait CredentialStore: Send + Sync {
    /// Persist `tokens` under `key`, replacing any previous entry.
    fn save(&self, key: &str, tokens: &StoredTokens) -> Result<()>;

    /// Load the entry for `key`, if any.
    fn load(&self, key: &str) -> Result<Option<StoredTokens>>;

    /// Remove the entry for `key`. Returns whether anything was removed.
    fn clear(&self, key: &str) -> Result<bool>;
}

/// Default credential directory (`~/.cio/credentials`).
pub fn default_credentials_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cio")
        .join("credentials")
}

/// Stores one JSON file per consumer key with 0600 permissions.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    base_dir: PathBuf,
}

impl Default for FileCredentialStore {
    fn default() -> Self {
        Self {
            base_dir: default_credentials_dir(),
        }
    }
}

impl FileCredentialStore {
    /// Store under `~/.cio/credentials/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store under a custom directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.base_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir)
                .map_err(|e| ClientError::Store(format!("failed to create credentials dir: {e}")))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.base_dir, fs::Permissions::from_mode(0o700))
                    .map_err(|e| ClientError::Store(format!("failed to set dir permissions: {e}")))?;
            }
        }
        Ok(())
    }

    /// Consumer keys are escaped so they cannot walk out of the directory.
    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", percent_encode(key)))
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, key: &str, tokens: &StoredTokens) -> Result<()> {
        self.ensure_dir()?;

        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(tokens)?;

        // Write to a temp file, then rename.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| ClientError::Store(format!("failed to write credentials: {e}")))?;
        set_file_permissions_0600(&tmp_path)?;
        fs::rename(&tmp_path, &path)
            .map_err(|e| ClientError::Store(format!("failed to rename credentials file: {e}")))?;

        debug!(path = %path.display(), "saved credentials");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<StoredTokens>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| ClientError::Store(format!("failed to read credentials: {e}")))?;
        let tokens: StoredTokens = serde_json::from_str(&json)
            .map_err(|e| ClientError::Store(format!("failed to parse credentials: {e}")))?;
        debug!(path = %path.display(), "loaded credentials");
        Ok(Some(tokens))
    }

    fn clear(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map_err(|e| ClientError::Store(format!("failed to delete credentials: {e}")))?;
        debug!(path = %path.display(), "cleared credentials");
        Ok(true)
    }
}

fn set_file_permissions_0600(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| ClientError::Store(format!("failed to set file permissions: {e}")))?;
    }

    #[cfg(not(unix))]
    {
        let _ = path;
    }

    Ok(())
}

/// Process-local store, mostly for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: Mutex<HashMap<String, StoredTokens>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredTokens>>> {
        self.entries
            .lock()
            .map_err(|_| ClientError::Store("credential store lock poisoned".into()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, key: &str, tokens: &StoredTokens) -> Result<()> {
        self.lock()?.insert(key.to_string(), tokens.clone());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<StoredTokens>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn clear(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorized() -> StoredTokens {
        StoredTokens {
            token: "tok".into(),
            token_secret: "tsec".into(),
            account_id: "acc-1".into(),
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());

        store.save("ck", &authorized()).unwrap();
        let loaded = store.load("ck").unwrap().unwrap();
        assert_eq!(loaded, authorized());
    }

    #[test]
    fn file_store_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        assert!(store.load("nope").unwrap().is_none());
        assert!(!store.clear("nope").unwrap());
    }

    #[test]
    fn file_store_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        store.save("ck", &authorized()).unwrap();
        assert!(store.clear("ck").unwrap());
        assert!(store.load("ck").unwrap().is_none());
    }

    #[test]
    fn file_store_keys_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        let other = StoredTokens {
            account_id: "acc-2".into(),
            ..authorized()
        };
        store.save("key-a", &authorized()).unwrap();
        store.save("key-b", &other).unwrap();
        assert_eq!(store.load("key-a").unwrap().unwrap().account_id, "acc-1");
        assert_eq!(store.load("key-b").unwrap().unwrap().account_id, "acc-2");
    }

    #[test]
    fn file_store_escapes_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        store.save("../evil", &authorized()).unwrap();
        let expected = dir.path().join("..%2Fevil.json");
        assert!(expected.exists());
    }

    #[test]
    fn file_store_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileCredentialStore::with_dir(&nested);
        store.save("ck", &authorized()).unwrap();
        assert!(nested.join("ck.json").exists());
    }

    #[cfg(unix)]
    #[test]
    fn file_permissions_are_0600() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        store.save("ck", &authorized()).unwrap();

        let meta = fs::metadata(dir.path().join("ck.json")).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o600);
    }

    #[test]
    fn file_store_never_writes_consumer_secret() {
        use crate::credentials::Credentials;

        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::with_dir(dir.path());
        let creds = Credentials::new("ck", "consumer-secret-value")
            .with_token("tok", "tsec")
            .with_account_id("acc-1");
        store.save("ck", &creds.stored_tokens().unwrap()).unwrap();

        let written = fs::read_to_string(dir.path().join("ck.json")).unwrap();
        assert!(!written.contains("consumer-secret-value"));
        assert!(!written.contains("consumer_secret"));
        assert!(written.contains("acc-1"));
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        store.save("ck", &authorized()).unwrap();
        assert_eq!(store.load("ck").unwrap(), Some(authorized()));
        assert!(store.clear("ck").unwrap());
        assert!(store.load("ck").unwrap().is_none());
    }
}
