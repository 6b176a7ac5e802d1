//! Lightweight key-value preferences
//!
//! Holds small string settings that live outside the save files:
//! the encryption key material and the selected language.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::config::data_directory;

/// Preferences file name inside the data directory
const PREFS_FILE: &str = "prefs.json";

/// Preferences storage errors
#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("prefs IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("prefs JSON error in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value store
///
/// Writes are buffered until [`Prefs::save`] is called.
pub trait Prefs {
    fn get_string(&self, key: &str) -> Option<String>;

    fn set_string(&mut self, key: &str, value: &str);

    fn delete_key(&mut self, key: &str);

    /// Flush pending writes to durable storage
    fn save(&mut self) -> Result<(), PrefsError>;

    fn has_key(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }

    /// Set every entry and flush, all or nothing
    ///
    /// If the flush fails the previous values are put back, so the
    /// in-memory view never holds writes that did not reach storage.
    fn commit(&mut self, entries: &[(&str, &str)]) -> Result<(), PrefsError> {
        let previous: Vec<(&str, Option<String>)> = entries
            .iter()
            .map(|(key, _)| (*key, self.get_string(key)))
            .collect();

        for (key, value) in entries {
            self.set_string(key, value);
        }

        if let Err(e) = self.save() {
            for (key, old) in previous.into_iter().rev() {
                match old {
                    Some(value) => self.set_string(key, &value),
                    None => self.delete_key(key),
                }
            }
            return Err(e);
        }
        Ok(())
    }
}

/// In-process preferences, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: BTreeMap<String, String>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Prefs for MemoryPrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        Ok(())
    }
}

/// Preferences persisted as a pretty-printed JSON object
#[derive(Debug, Clone)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// Open the prefs file at `path`, starting empty if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        let values = if path.exists() {
            let data = fs::read_to_string(&path).map_err(|source| PrefsError::Io {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| PrefsError::Json {
                path: path.clone(),
                source,
            })?
        } else {
            BTreeMap::new()
        };

        log::debug!("Prefs opened from {:?} ({} keys)", path, values.len());
        Ok(Self { path, values })
    }

    /// Open `prefs.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Result<Self, PrefsError> {
        Self::open(dir.join(PREFS_FILE))
    }

    /// Open the prefs file in the platform data directory
    pub fn default_location() -> Result<Self, PrefsError> {
        Self::in_dir(&data_directory())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Prefs for FilePrefs {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn delete_key(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&mut self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PrefsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values).map_err(|source| PrefsError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| PrefsError::Io {
            path: self.path.clone(),
            source,
        })?;

        log::debug!("Prefs saved to {:?}", self.path);
        Ok(())
    }
}
