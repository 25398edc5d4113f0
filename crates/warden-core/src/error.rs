//! Error types for vault core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages.
//!
//! Two variants deliberately carry no cause detail: `IncorrectPassword`
//! and `DecryptionFailed`. A failed login must not reveal anything beyond
//! "incorrect password", and a failed decrypt must not reveal whether the
//! ciphertext, nonce, tag, or key was at fault.

use thiserror::Error;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Master password verification failed at login or rotation.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// AEAD tag verification failed at decrypt.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// The vault already holds a master credential.
    #[error("Vault is already initialized")]
    AlreadyInitialized,

    /// No master credential exists yet.
    #[error("Vault is not initialized")]
    NotInitialized,

    /// Credential not found by id.
    #[error("Credential not found: {0}")]
    CredentialNotFound(u64),

    /// Password rotation could not complete; nothing was persisted.
    #[error("Password rotation failed: {0}")]
    RotationFailed(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encryption or key-derivation error
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}
