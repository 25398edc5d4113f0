//! Cryptographic operations for the vault.
//!
//! This module provides key derivation and per-record authenticated
//! encryption using well-audited libraries:
//! - **PBKDF2-HMAC-SHA512**: deliberately slow, salted key stretching
//! - **AES-256-GCM**: authenticated encryption for individual secrets
//!
//! ## Security Model
//!
//! - One master password protects everything; nothing else is a secret.
//! - The stored verifier hash and the encryption key are derived over
//!   domain-separated inputs, so the verifier is not on the key's
//!   derivation path.
//! - Every encryption uses a fresh random nonce; identical plaintexts
//!   never produce identical ciphertexts.
//! - Key material is zeroized from memory on drop.
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the vault file
//! - Offline brute-force attacks on the master password
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod kdf;
pub mod password;

pub use cipher::{decrypt_secret, encrypt_secret, EncryptedSecret};
pub use kdf::{derive_key, generate_salt, hash_master_password, MasterKey};
pub use password::{
    generate_password, password_strength, validate_master_password, PasswordSpec,
    RESET_MIN_PASSWORD_LEN, SETUP_MIN_PASSWORD_LEN,
};
