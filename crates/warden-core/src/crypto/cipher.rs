//! Per-record authenticated encryption (AES-256-GCM).
//!
//! Each secret is sealed independently under the session key with a fresh
//! random 16-byte nonce, producing a detached {ciphertext, nonce, auth_tag}
//! triple stored as lowercase hex. Decryption verifies the tag before
//! releasing a single plaintext byte; all failures collapse into
//! [`VaultError::DecryptionFailed`] so the caller cannot distinguish a
//! tampered ciphertext from a wrong key.

use aes_gcm::{
    aead::{consts::U16, rand_core::RngCore, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Key, Nonce,
};
use serde::{Deserialize, Serialize};

use crate::crypto::kdf::MasterKey;
use crate::error::{Result, VaultError};

/// AES-256-GCM parameterized with the vault's 16-byte nonce.
type RecordAead = AesGcm<Aes256, U16>;

/// Nonce length in bytes.
const NONCE_LENGTH: usize = 16;

/// GCM authentication tag length in bytes.
const TAG_LENGTH: usize = 16;

/// An encrypted secret as persisted inside a credential record.
///
/// All three fields are lowercase hex. `ciphertext` is empty when the
/// plaintext was the empty string; the tag still authenticates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    pub ciphertext: String,
    pub nonce: String,
    pub auth_tag: String,
}

/// Encrypt a plaintext secret under the given key.
///
/// A fresh random nonce is generated on every call, so encrypting the same
/// plaintext twice under the same key yields different ciphertext.
pub fn encrypt_secret(plaintext: &str, key: &MasterKey) -> Result<EncryptedSecret> {
    let cipher = RecordAead::new(Key::<RecordAead>::from_slice(key.as_bytes()));

    let mut nonce_bytes = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::<U16>::from_slice(&nonce_bytes);

    // RustCrypto AEADs return ciphertext with the tag appended.
    let sealed = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| VaultError::Crypto("encryption failed".to_string()))?;
    let (ciphertext, tag) = sealed.split_at(sealed.len() - TAG_LENGTH);

    Ok(EncryptedSecret {
        ciphertext: hex::encode(ciphertext),
        nonce: hex::encode(nonce_bytes),
        auth_tag: hex::encode(tag),
    })
}

/// Decrypt an [`EncryptedSecret`] under the given key.
///
/// # Errors
///
/// Returns [`VaultError::DecryptionFailed`] if the tag does not verify:
/// tampered ciphertext, tampered nonce, tampered tag, or wrong key. The
/// error carries no detail about which.
pub fn decrypt_secret(secret: &EncryptedSecret, key: &MasterKey) -> Result<String> {
    let ciphertext = hex::decode(&secret.ciphertext).map_err(|_| VaultError::DecryptionFailed)?;
    let nonce_bytes = hex::decode(&secret.nonce).map_err(|_| VaultError::DecryptionFailed)?;
    let tag = hex::decode(&secret.auth_tag).map_err(|_| VaultError::DecryptionFailed)?;

    if nonce_bytes.len() != NONCE_LENGTH || tag.len() != TAG_LENGTH {
        return Err(VaultError::DecryptionFailed);
    }

    let cipher = RecordAead::new(Key::<RecordAead>::from_slice(key.as_bytes()));
    let nonce = Nonce::<U16>::from_slice(&nonce_bytes);

    let mut sealed = ciphertext;
    sealed.extend_from_slice(&tag);

    let plaintext = cipher
        .decrypt(nonce, sealed.as_slice())
        .map_err(|_| VaultError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| VaultError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> MasterKey {
        MasterKey::from_bytes([byte; 32])
    }

    fn flip_first_hex_char(s: &str) -> String {
        let mut chars: Vec<char> = s.chars().collect();
        chars[0] = if chars[0] == '0' { '1' } else { '0' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_round_trip() {
        let k = key(7);
        let sealed = encrypt_secret("hunter2", &k).unwrap();
        assert_eq!(decrypt_secret(&sealed, &k).unwrap(), "hunter2");
    }

    #[test]
    fn test_empty_string_round_trip() {
        let k = key(7);
        let sealed = encrypt_secret("", &k).unwrap();
        assert_eq!(sealed.ciphertext, "");
        assert_eq!(decrypt_secret(&sealed, &k).unwrap(), "");
    }

    #[test]
    fn test_long_ascii_round_trip() {
        let k = key(7);
        let plaintext = "a1b2c3d4".repeat(125);
        assert_eq!(plaintext.len(), 1000);
        let sealed = encrypt_secret(&plaintext, &k).unwrap();
        assert_eq!(decrypt_secret(&sealed, &k).unwrap(), plaintext);
    }

    #[test]
    fn test_long_unicode_round_trip() {
        let k = key(7);
        let plaintext = "pässwörd-密码-🔑".repeat(100);
        let sealed = encrypt_secret(&plaintext, &k).unwrap();
        assert_eq!(decrypt_secret(&sealed, &k).unwrap(), plaintext);
    }

    #[test]
    fn test_symbol_string_round_trip() {
        let k = key(7);
        let plaintext = "!@#$%^&*()_+-=[]{}|;:,.<>?";
        let sealed = encrypt_secret(plaintext, &k).unwrap();
        assert_eq!(decrypt_secret(&sealed, &k).unwrap(), plaintext);
    }

    #[test]
    fn test_encryption_is_nondeterministic() {
        let k = key(7);
        let a = encrypt_secret("same plaintext", &k).unwrap();
        let b = encrypt_secret("same plaintext", &k).unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let k = key(7);
        let mut sealed = encrypt_secret("hunter2", &k).unwrap();
        sealed.ciphertext = flip_first_hex_char(&sealed.ciphertext);
        assert!(matches!(
            decrypt_secret(&sealed, &k),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampered_nonce_rejected() {
        let k = key(7);
        let mut sealed = encrypt_secret("hunter2", &k).unwrap();
        sealed.nonce = flip_first_hex_char(&sealed.nonce);
        assert!(matches!(
            decrypt_secret(&sealed, &k),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_tampered_tag_rejected() {
        let k = key(7);
        let mut sealed = encrypt_secret("hunter2", &k).unwrap();
        sealed.auth_tag = flip_first_hex_char(&sealed.auth_tag);
        assert!(matches!(
            decrypt_secret(&sealed, &k),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let sealed = encrypt_secret("hunter2", &key(7)).unwrap();
        assert!(matches!(
            decrypt_secret(&sealed, &key(8)),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_malformed_hex_rejected() {
        let k = key(7);
        let mut sealed = encrypt_secret("hunter2", &k).unwrap();
        sealed.nonce = "not hex at all".to_string();
        assert!(matches!(
            decrypt_secret(&sealed, &k),
            Err(VaultError::DecryptionFailed)
        ));
    }
}
