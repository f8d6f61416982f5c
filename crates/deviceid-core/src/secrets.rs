//! Secret storage for the locally cached identification token.
//!
//! The identification service correlates repeat visits through a token the
//! client persists between launches. Production code uses the file-backed
//! store under the per-user data directory; tests use the in-memory store.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use thiserror::Error;

/// Directory name for deviceid data under the user's home directory.
const DATA_DIR: &str = ".deviceid";
/// Filename for the file-backed secret store.
const SECRETS_FILE: &str = "secrets.json";

/// Service namespace of the cached identification token.
pub const TOKEN_SERVICE: &str = "deviceID-token";
/// Account namespace of the cached identification token.
pub const TOKEN_ACCOUNT: &str = "multi";

/// Errors raised by secret store operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// File system I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Store file contents could not be parsed or serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Per-user data directory could not be resolved or created.
    #[error("Data dir error: {0}")]
    DataDir(String),
}

/// Namespaced credential storage.
///
/// Backed by the platform credential vault on mobile targets; this crate
/// ships a file-backed implementation and an in-memory one for tests.
pub trait SecretStore: Send + Sync {
    /// Read the secret stored under `(service, account)`, if any.
    fn get(&self, service: &str, account: &str) -> Option<Vec<u8>>;

    /// Write a secret under `(service, account)`, replacing any previous
    /// value.
    fn put(&self, service: &str, account: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// File-backed secret store: a JSON map of `service/account` keys to
/// base64 values.
pub struct FileSecretStore {
    path: PathBuf,
    // put() is read-modify-write; serialize writers on this store.
    write_lock: Mutex<()>,
}

impl FileSecretStore {
    /// Create a store backed by the given file. The file is created on
    /// first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Create a store at the default location,
    /// `~/.deviceid/secrets.json`, creating the directory if necessary.
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let home = dirs::home_dir()
            .ok_or_else(|| StoreError::DataDir("failed_to_get_home_dir".to_string()))?;
        let data_dir = home.join(DATA_DIR);
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
        }
        Ok(Self::new(data_dir.join(SECRETS_FILE)))
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn entry_key(service: &str, account: &str) -> String {
        format!("{service}/{account}")
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, service: &str, account: &str) -> Option<Vec<u8>> {
        let map = match self.read_map() {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("secret_store_read_failed: {}", e);
                return None;
            },
        };
        let encoded = map.get(&Self::entry_key(service, account))?;
        match BASE64.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("secret_store_decode_failed: {}", e);
                None
            },
        }
    }

    fn put(&self, service: &str, account: &str, value: &[u8]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = self.read_map()?;
        drop(map.insert(Self::entry_key(service, account), BASE64.encode(value)));
        let content = serde_json::to_string_pretty(&map)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory secret store for tests and ephemeral processes.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemorySecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, service: &str, account: &str) -> Option<Vec<u8>> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(&(service.to_string(), account.to_string())).cloned()
    }

    fn put(&self, service: &str, account: &str, value: &[u8]) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        drop(entries.insert((service.to_string(), account.to_string()), value.to_vec()));
        Ok(())
    }
}
