//! AES-256-CBC text encryption and SHA-256 integrity digests

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha256};

use super::keys::KeyMaterial;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Encrypt `plain_text` and return the base64 ciphertext
pub fn encrypt(keys: &KeyMaterial, plain_text: &str) -> String {
    let (key, iv) = (*keys.key(), *keys.iv());
    let cipher = Aes256CbcEnc::new(&key.into(), &iv.into());
    let bytes = cipher.encrypt_padded_vec_mut::<Pkcs7>(plain_text.as_bytes());
    BASE64.encode(bytes)
}

/// Decrypt base64 ciphertext produced by [`encrypt`]
///
/// Fails on malformed base64, bad padding (usually a key mismatch)
/// or plaintext that is not UTF-8.
pub fn decrypt(keys: &KeyMaterial, cipher_text: &str) -> Result<String, String> {
    let bytes = BASE64
        .decode(cipher_text)
        .map_err(|e| format!("ciphertext is not base64: {}", e))?;

    let (key, iv) = (*keys.key(), *keys.iv());
    let cipher = Aes256CbcDec::new(&key.into(), &iv.into());
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
        .map_err(|_| "invalid padding, wrong key or damaged ciphertext".to_string())?;

    String::from_utf8(plain).map_err(|_| "decrypted data is not UTF-8".to_string())
}

/// Lowercase hex SHA-256 of `data`
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::keys::{IV_LEN, KEY_LEN};

    fn fixed_keys() -> KeyMaterial {
        KeyMaterial::from_bytes([0x11; KEY_LEN], [0x22; IV_LEN])
    }

    #[test]
    fn test_encrypt_decrypt() {
        let keys = fixed_keys();
        let text = "{\n  \"level\": 3\n}";

        let encrypted = encrypt(&keys, text);
        assert_ne!(encrypted, text);
        assert_eq!(decrypt(&keys, &encrypted).unwrap(), text);
    }

    #[test]
    fn test_ciphertext_is_block_padded() {
        let keys = fixed_keys();
        // Exactly one block of input still gets a full padding block
        let raw = BASE64.decode(encrypt(&keys, "0123456789abcdef")).unwrap();
        assert_eq!(raw.len(), 32);

        let raw = BASE64.decode(encrypt(&keys, "")).unwrap();
        assert_eq!(raw.len(), 16);
    }

    #[test]
    fn test_same_keys_are_deterministic() {
        let keys = fixed_keys();
        assert_eq!(encrypt(&keys, "gold"), encrypt(&keys, "gold"));
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = encrypt(&fixed_keys(), "{\"level\":3,\"gold\":150,\"name\":\"foster\"}");
        let other = KeyMaterial::from_bytes([0x33; KEY_LEN], [0x22; IV_LEN]);
        assert!(decrypt(&other, &encrypted).is_err());
    }

    #[test]
    fn test_bad_base64_fails() {
        assert!(decrypt(&fixed_keys(), "not*base64").is_err());
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let keys = fixed_keys();
        let raw = BASE64.decode(encrypt(&keys, "some saved state")).unwrap();
        let truncated = BASE64.encode(&raw[..raw.len() - 3]);
        assert!(decrypt(&keys, &truncated).is_err());
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
