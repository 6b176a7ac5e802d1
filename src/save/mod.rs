//! Save/load system
//!
//! Encrypted, hash-verified save slots and the key material behind them.

pub mod cipher;
pub mod config;
pub mod keys;
pub mod prefs;
pub mod secure_store;

pub use config::{SaveSlot, StoreConfig, data_directory};
pub use keys::{KeyMaterial, KeySource};
pub use prefs::{FilePrefs, MemoryPrefs, Prefs, PrefsError};
pub use secure_store::{SaveError, SavePaths, SecureStore};
