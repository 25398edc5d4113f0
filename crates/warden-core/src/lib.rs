//! # Warden Core
//!
//! Core library for Warden - a local, single-user secrets vault with
//! per-record authenticated encryption under a master-password-derived
//! key.
//!
//! This crate provides the credential cryptography and vault-record
//! lifecycle independent of any user interface.
//!
//! ## Architecture
//!
//! - **crypto**: key derivation (PBKDF2-HMAC-SHA512), per-record AEAD
//!   (AES-256-GCM), password policy and utilities
//! - **store**: the persisted vault document, storage backends, and the
//!   credential store enforcing record-lifecycle invariants
//! - **session**: the authenticated session holding the derived key, and
//!   the master-password rotation protocol
//!
//! ## Security model in one paragraph
//!
//! One master password protects everything. Logins are checked against a
//! stored PBKDF2 verifier; secrets are sealed individually with
//! AES-256-GCM under a key derived from the same password over a
//! domain-separated input. Changing the password re-encrypts every
//! secret and commits atomically; forgetting it is unrecoverable by
//! design; there is no escrow.

pub mod crypto;
pub mod error;
pub mod session;
pub mod store;

pub use error::{Result, VaultError};
pub use session::{CredentialChanges, CredentialInput, ExportedCredential, VaultSession};
pub use store::{CredentialFilter, CredentialStore, JsonFileBackend, MemoryBackend, VaultBackend};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
