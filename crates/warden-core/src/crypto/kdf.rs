//! Master-password key derivation using PBKDF2-HMAC-SHA512.
//!
//! A single master password yields two values: a verifier hash stored for
//! login checks, and the symmetric key used to encrypt record secrets.
//! Both are derived with the same stretching parameters, but over
//! domain-separated salt inputs so that the stored verifier is not a value
//! on the encryption key's derivation path.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::ZeroizeOnDrop;

/// PBKDF2 iteration count. High on purpose: stolen verifier hashes must be
/// expensive to brute-force.
const PBKDF2_ROUNDS: u32 = 100_000;

/// Length of the random salt in bytes (hex-encoded to 64 characters).
const SALT_LENGTH: usize = 32;

/// Length of derived output in bytes (256 bits, sized for AES-256).
const KEY_LENGTH: usize = 32;

/// Domain tag appended to the salt when deriving the login verifier.
const VERIFY_CONTEXT: &str = "/verify";

/// Domain tag appended to the salt when deriving the encryption key.
const ENCRYPT_CONTEXT: &str = "/encrypt";

/// The symmetric key derived from the master password.
///
/// Key material is zeroized from memory when dropped, and `Debug` output
/// is redacted.
#[derive(Clone, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt as a 64-character lowercase hex string.
///
/// Uses the operating system CSPRNG. Called once at vault setup and again
/// whenever the master password is changed or reset.
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn stretch(password: &str, salt: &str, context: &str) -> [u8; KEY_LENGTH] {
    let mut out = [0u8; KEY_LENGTH];
    let salt_input = format!("{salt}{context}");
    pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt_input.as_bytes(),
        PBKDF2_ROUNDS,
        &mut out,
    );
    out
}

/// Compute the login verifier hash for a (password, salt) pair.
///
/// Deterministic: the same inputs always produce the same 64-character
/// lowercase hex string. Different salts yield unrelated hashes.
pub fn hash_master_password(password: &str, salt: &str) -> String {
    hex::encode(stretch(password, salt, VERIFY_CONTEXT))
}

/// Derive the symmetric encryption key for a (password, salt) pair.
///
/// Same stretching parameters as [`hash_master_password`], but a distinct
/// derivation domain: knowing the stored verifier hash does not yield the
/// key, and vice versa.
pub fn derive_key(password: &str, salt: &str) -> MasterKey {
    MasterKey::from_bytes(stretch(password, salt, ENCRYPT_CONTEXT))
}
