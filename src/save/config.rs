//! Save location configuration

use std::fmt;
use std::path::PathBuf;

/// Identifier selecting which save file pair to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SaveSlot(pub u8);

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Get the platform persistent-data directory
pub fn data_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "fostermonster", "FosterTheMonster") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Where and which slot a [`SecureStore`](super::SecureStore) reads and writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory holding the save file pairs
    pub data_dir: PathBuf,
    /// Slot used by save, load and delete
    pub slot: SaveSlot,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            slot: SaveSlot::default(),
        }
    }

    /// Use the platform data directory and slot 0
    pub fn default_location() -> Self {
        Self::new(data_directory())
    }

    pub fn with_slot(mut self, slot: SaveSlot) -> Self {
        self.slot = slot;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::default_location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_slot() {
        let config = StoreConfig::new("/tmp/fk").with_slot(SaveSlot(2));
        assert_eq!(config.slot, SaveSlot(2));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/fk"));
        assert_eq!(StoreConfig::new("/tmp/fk").slot, SaveSlot(0));
    }
}
