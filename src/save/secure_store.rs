//! Encrypted save slots
//!
//! Save: JSON -> AES-CBC -> base64, SHA-256 of the base64 text next to it.
//! Load verifies the hash before any decryption is attempted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::cipher::{decrypt, encrypt, sha256_hex};
use super::config::{SaveSlot, StoreConfig};
use super::keys::{KeyMaterial, KeySource};
use super::prefs::{Prefs, PrefsError};

/// Extension appended to the ciphertext path for the digest file
const HASH_EXTENSION: &str = "hash";

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Save record {path:?} failed its integrity check")]
    Integrity { path: PathBuf },
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to deserialize state: {0}")]
    Deserialize(#[source] serde_json::Error),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
}

impl SaveError {
    fn io(path: &Path, source: io::Error) -> Self {
        SaveError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The two files making up one save record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePaths {
    /// `save{N}.json`, base64 ciphertext
    pub data: PathBuf,
    /// `save{N}.json.hash`, hex digest of the data file
    pub hash: PathBuf,
}

impl SavePaths {
    pub fn new(dir: &Path, slot: SaveSlot) -> Self {
        let data = dir.join(format!("save{}.json", slot));
        let mut hash = data.clone().into_os_string();
        hash.push(".");
        hash.push(HASH_EXTENSION);
        Self {
            data,
            hash: PathBuf::from(hash),
        }
    }
}

/// Encrypted, tamper-evident state persistence for one save slot
#[derive(Debug, Clone)]
pub struct SecureStore {
    config: StoreConfig,
    keys: KeyMaterial,
}

impl SecureStore {
    pub fn new(config: StoreConfig, keys: KeyMaterial) -> Self {
        Self { config, keys }
    }

    /// Create a store, loading key material from `prefs` or generating it
    pub fn open(config: StoreConfig, prefs: &mut dyn Prefs) -> Result<Self, SaveError> {
        let (keys, source) = KeyMaterial::ensure(prefs)?;
        let store = Self::new(config, keys);

        if source == KeySource::Generated && store.exists() {
            log::warn!(
                "New encryption keys generated while slot {} has a record; it can no longer be loaded",
                store.config.slot
            );
        }

        Ok(store)
    }

    /// Same store, operating on another slot
    pub fn with_slot(mut self, slot: SaveSlot) -> Self {
        self.config.slot = slot;
        self
    }

    pub fn slot(&self) -> SaveSlot {
        self.config.slot
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn paths(&self) -> SavePaths {
        SavePaths::new(&self.config.data_dir, self.config.slot)
    }

    /// Check if a record exists in the current slot
    pub fn exists(&self) -> bool {
        self.paths().data.exists()
    }

    /// Encrypt `state` and overwrite the current slot
    pub fn save<T: Serialize>(&self, state: &T) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(state).map_err(SaveError::Serialize)?;
        let encrypted = encrypt(&self.keys, &json);
        let hash = sha256_hex(encrypted.as_bytes());

        // Ensure directory exists
        let dir = &self.config.data_dir;
        fs::create_dir_all(dir).map_err(|e| SaveError::io(dir, e))?;

        let paths = self.paths();
        fs::write(&paths.data, &encrypted).map_err(|e| SaveError::io(&paths.data, e))?;
        fs::write(&paths.hash, &hash).map_err(|e| SaveError::io(&paths.hash, e))?;

        log::info!("State saved to slot {}", self.config.slot);
        log::debug!("Saved state: {} bytes of JSON, {} bytes encrypted", json.len(), encrypted.len());
        Ok(())
    }

    /// Load the current slot, `Ok(None)` if nothing has been saved
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, SaveError> {
        let paths = self.paths();

        let encrypted = match fs::read(&paths.data) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No save record in slot {}", self.config.slot);
                return Ok(None);
            }
            Err(e) => return Err(SaveError::io(&paths.data, e)),
        };

        let stored_hash = match fs::read_to_string(&paths.hash) {
            Ok(hash) => hash,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Slot {} has no hash file", self.config.slot);
                return Err(SaveError::Integrity { path: paths.data });
            }
            Err(e) => return Err(SaveError::io(&paths.hash, e)),
        };

        if sha256_hex(&encrypted) != stored_hash {
            log::warn!("Slot {} failed its integrity check", self.config.slot);
            return Err(SaveError::Integrity { path: paths.data });
        }

        let encrypted = String::from_utf8(encrypted)
            .map_err(|_| SaveError::Decryption("ciphertext is not UTF-8".to_string()))?;
        let json = decrypt(&self.keys, &encrypted).map_err(SaveError::Decryption)?;
        let state = serde_json::from_str(&json).map_err(SaveError::Deserialize)?;

        log::info!("State loaded from slot {}", self.config.slot);
        Ok(Some(state))
    }

    /// Delete the current slot's files, if any
    pub fn delete(&self) -> Result<(), SaveError> {
        let paths = self.paths();
        remove_if_present(&paths.data)?;
        remove_if_present(&paths.hash)?;
        log::info!("Deleted save slot {}", self.config.slot);
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> Result<(), SaveError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SaveError::io(path, e)),
    }
}
