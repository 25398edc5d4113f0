//! Storage for the vault.
//!
//! The vault persists as one JSON document ([`document::VaultDocument`])
//! behind the [`VaultBackend`] trait, which has whole-document
//! granularity only. [`CredentialStore`] fronts the backend and enforces
//! the record-lifecycle invariants; anything security-sensitive that the
//! persistence layer must not be trusted with lives there.
//!
//! ## Why whole-document
//!
//! Password rotation and reset touch the master credential and every
//! record together. With a single document there is exactly one commit
//! point, so those operations are atomic by construction: the document on
//! disk is always entirely pre-rotation or entirely post-rotation.

pub mod backend;
pub mod credentials;
pub mod document;
pub mod records;

// Re-export public types
pub use backend::{JsonFileBackend, MemoryBackend, VaultBackend};
pub use credentials::CredentialStore;
pub use document::{
    AutoLockConfig, ClipboardConfig, DangerousOpsConfig, VaultConfig, VaultDocument,
};
pub use records::{
    CredentialFilter, CredentialRecord, CredentialSummary, CredentialUpdate, LoginType,
    MasterCredential, NewCredential, ALL_CATEGORIES, UNCATEGORIZED,
};
