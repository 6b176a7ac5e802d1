//! Encryption key material
//!
//! One AES-256 key and CBC IV per installation, kept in [`Prefs`]
//! as base64 and reused for every save.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use rand::rngs::OsRng;

use super::prefs::{Prefs, PrefsError};

/// Prefs key holding the base64 cipher key
pub const KEY_PREF: &str = "EncryptionKey";
/// Prefs key holding the base64 IV
pub const IV_PREF: &str = "EncryptionIV";

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;
/// AES block / CBC IV length in bytes
pub const IV_LEN: usize = 16;

/// Where [`KeyMaterial::ensure`] got its keys from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Decoded from prefs
    Loaded,
    /// Freshly generated and written to prefs
    Generated,
}

/// Symmetric key and IV, always handled as a pair
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial").finish_non_exhaustive()
    }
}

impl KeyMaterial {
    pub fn from_bytes(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Generate a fresh key and IV from the OS random source
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// Decode a base64 key/IV pair, `None` if either is malformed or the wrong length
    pub fn from_base64(key: &str, iv: &str) -> Option<Self> {
        let key: [u8; KEY_LEN] = BASE64.decode(key).ok()?.try_into().ok()?;
        let iv: [u8; IV_LEN] = BASE64.decode(iv).ok()?.try_into().ok()?;
        Some(Self { key, iv })
    }

    /// Read both values from prefs, `None` unless both are present and valid
    pub fn load(prefs: &dyn Prefs) -> Option<Self> {
        let key = prefs.get_string(KEY_PREF)?;
        let iv = prefs.get_string(IV_PREF)?;
        Self::from_base64(&key, &iv)
    }

    /// Load existing key material, or generate and persist a new pair
    ///
    /// Anything short of a complete valid pair is replaced as a whole.
    /// Records encrypted under the old pair become unreadable.
    pub fn ensure(prefs: &mut dyn Prefs) -> Result<(Self, KeySource), PrefsError> {
        if let Some(keys) = Self::load(prefs) {
            log::debug!("Loaded encryption key material from prefs");
            return Ok((keys, KeySource::Loaded));
        }

        match (prefs.has_key(KEY_PREF), prefs.has_key(IV_PREF)) {
            (false, false) => log::info!("No encryption key material found, generating"),
            (true, true) => log::warn!("Stored encryption key material is corrupt, regenerating"),
            _ => log::warn!("Stored encryption key material is incomplete, regenerating"),
        }

        let keys = Self::generate();
        keys.persist(prefs)?;
        Ok((keys, KeySource::Generated))
    }

    /// Write both values to prefs and flush
    ///
    /// On a failed flush prefs keep whatever they held before.
    pub fn persist(&self, prefs: &mut dyn Prefs) -> Result<(), PrefsError> {
        let key = BASE64.encode(self.key);
        let iv = BASE64.encode(self.iv);
        prefs.commit(&[(KEY_PREF, key.as_str()), (IV_PREF, iv.as_str())])
    }

    /// Remove both values from prefs and flush
    pub fn clear(prefs: &mut dyn Prefs) -> Result<(), PrefsError> {
        prefs.delete_key(KEY_PREF);
        prefs.delete_key(IV_PREF);
        prefs.save()
    }

    pub fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::prefs::{FilePrefs, MemoryPrefs};

    #[test]
    fn test_ensure_generates_then_reuses() {
        let mut prefs = MemoryPrefs::new();

        let (first, source) = KeyMaterial::ensure(&mut prefs).unwrap();
        assert_eq!(source, KeySource::Generated);
        assert!(prefs.has_key(KEY_PREF));
        assert!(prefs.has_key(IV_PREF));

        let (second, source) = KeyMaterial::ensure(&mut prefs).unwrap();
        assert_eq!(source, KeySource::Loaded);
        assert_eq!(first, second);
    }

    #[test]
    fn test_stored_values_are_base64() {
        let mut prefs = MemoryPrefs::new();
        let (keys, _) = KeyMaterial::ensure(&mut prefs).unwrap();

        let key = BASE64.decode(prefs.get_string(KEY_PREF).unwrap()).unwrap();
        let iv = BASE64.decode(prefs.get_string(IV_PREF).unwrap()).unwrap();
        assert_eq!(key.as_slice(), keys.key());
        assert_eq!(iv.as_slice(), keys.iv());
    }

    #[test]
    fn test_half_present_pair_regenerates_both() {
        let mut prefs = MemoryPrefs::new();
        let (original, _) = KeyMaterial::ensure(&mut prefs).unwrap();
        let old_iv = prefs.get_string(IV_PREF).unwrap();

        prefs.delete_key(KEY_PREF);
        let (fresh, source) = KeyMaterial::ensure(&mut prefs).unwrap();

        assert_eq!(source, KeySource::Generated);
        assert_ne!(fresh, original);
        // IV was replaced too, not mixed with the new key
        assert_ne!(prefs.get_string(IV_PREF).unwrap(), old_iv);
    }

    #[test]
    fn test_wrong_length_regenerates() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_string(KEY_PREF, &BASE64.encode([1u8; 16]));
        prefs.set_string(IV_PREF, &BASE64.encode([2u8; IV_LEN]));

        let (keys, source) = KeyMaterial::ensure(&mut prefs).unwrap();
        assert_eq!(source, KeySource::Generated);
        assert_eq!(KeyMaterial::load(&prefs), Some(keys));
    }

    #[test]
    fn test_failed_flush_leaves_no_keys_behind() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut prefs = FilePrefs::in_dir(&blocker).unwrap();

        assert!(KeyMaterial::ensure(&mut prefs).is_err());
        assert!(!prefs.has_key(KEY_PREF));
        assert!(!prefs.has_key(IV_PREF));

        // Retrying still fails instead of picking up unflushed keys
        assert!(KeyMaterial::ensure(&mut prefs).is_err());
    }

    #[test]
    fn test_bad_base64_rejected() {
        assert!(KeyMaterial::from_base64("%%%", "%%%").is_none());
    }

    #[test]
    fn test_clear() {
        let mut prefs = MemoryPrefs::new();
        KeyMaterial::ensure(&mut prefs).unwrap();
        KeyMaterial::clear(&mut prefs).unwrap();
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_debug_hides_bytes() {
        let keys = KeyMaterial::from_bytes([7u8; KEY_LEN], [9u8; IV_LEN]);
        assert_eq!(format!("{:?}", keys), "KeyMaterial { .. }");
    }
}
