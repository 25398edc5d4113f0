//! The vault document: every persisted collection in one versioned struct.
//!
//! The whole vault round-trips through a single JSON document, which is
//! what makes multi-collection updates (password rotation, reset)
//! atomic: one `save` either lands completely or not at all.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::records::{CredentialRecord, MasterCredential};

/// Current document format version.
pub const DOCUMENT_VERSION: u32 = 1;

/// Categories seeded into a freshly created vault.
const DEFAULT_CATEGORIES: [&str; 6] = ["Social", "Work", "Banking", "Email", "Shopping", "Other"];

/// Everything the vault persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultDocument {
    /// Format version; bumped by [`VaultDocument::migrate`].
    #[serde(default)]
    pub version: u32,

    /// The singleton master credential. Absent means uninitialized.
    #[serde(default)]
    pub master: Option<MasterCredential>,

    #[serde(default)]
    pub credentials: Vec<CredentialRecord>,

    /// User-managed category names; the `Uncategorized` sentinel is
    /// always valid and never listed here.
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub config: VaultConfig,

    /// Next credential id. Strictly monotonic and never reset, not even
    /// by clear-all, so a deleted id can never be mistaken for a live one.
    #[serde(default = "first_credential_id")]
    pub next_credential_id: u64,
}

fn first_credential_id() -> u64 {
    1
}

impl Default for VaultDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION,
            master: None,
            credentials: Vec::new(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            config: VaultConfig::default(),
            next_credential_id: 1,
        }
    }
}

impl VaultDocument {
    /// Bring a loaded document up to the current format.
    ///
    /// Applied once when a store is opened. Fills collections and config
    /// fields that predate their introduction (missing config fields are
    /// already handled by serde defaults) and repairs an id counter that
    /// lags behind existing records. Returns `true` if anything changed
    /// and the document should be written back.
    pub fn migrate(&mut self) -> bool {
        let mut changed = false;

        if self.version < DOCUMENT_VERSION {
            if self.categories.is_empty() {
                self.categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
            }
            self.version = DOCUMENT_VERSION;
            changed = true;
        }

        // Older vaults tracked the counter in memory only.
        let min_next_id = self
            .credentials
            .iter()
            .map(|record| record.id + 1)
            .max()
            .unwrap_or(1);
        if self.next_credential_id < min_next_id {
            self.next_credential_id = min_next_id;
            changed = true;
        }

        if changed {
            info!(version = self.version, "vault document migrated");
        }
        changed
    }
}

/// Vault-level settings.
///
/// Every field carries a serde default so documents written by older
/// versions gain new fields with their defaults on the next migration.
/// The core only stores these; acting on them (lock timers, clipboard
/// clearing) is the embedding application's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default)]
    pub auto_lock: AutoLockConfig,

    #[serde(default)]
    pub clipboard: ClipboardConfig,

    #[serde(default)]
    pub dangerous: DangerousOpsConfig,
}

/// Inactivity auto-lock policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoLockConfig {
    pub enabled: bool,
    pub timeout_minutes: u32,
}

impl Default for AutoLockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_minutes: 5,
        }
    }
}

/// Clipboard auto-clear policy for revealed secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardConfig {
    pub auto_clear: bool,
    pub timeout_seconds: u32,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            auto_clear: true,
            timeout_seconds: 30,
        }
    }
}

/// Gates for destructive operations. Clear-all is off until the user
/// opts in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DangerousOpsConfig {
    #[serde(default)]
    pub allow_clear_all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_document_is_current() {
        let mut document = VaultDocument::default();
        assert!(!document.migrate());
        assert_eq!(document.version, DOCUMENT_VERSION);
    }

    #[test]
    fn test_empty_json_migrates_to_defaults() {
        let mut document: VaultDocument = serde_json::from_str("{}").unwrap();
        assert!(document.migrate());
        assert_eq!(document.version, DOCUMENT_VERSION);
        assert_eq!(document.categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(document.config, VaultConfig::default());
        assert_eq!(document.next_credential_id, 1);
    }

    #[test]
    fn test_partial_config_gains_missing_sections() {
        let json = r#"{
            "version": 1,
            "config": { "clipboard": { "auto_clear": false, "timeout_seconds": 10 } }
        }"#;
        let document: VaultDocument = serde_json::from_str(json).unwrap();
        assert!(!document.config.clipboard.auto_clear);
        assert!(document.config.auto_lock.enabled);
        assert!(!document.config.dangerous.allow_clear_all);
    }

    #[test]
    fn test_id_counter_catches_up_to_records() {
        let mut document: VaultDocument = serde_json::from_str(
            r#"{
                "version": 1,
                "credentials": [{
                    "id": 9,
                    "software_name": "GitHub",
                    "category": "Work",
                    "created_at": "2024-01-01T00:00:00Z",
                    "updated_at": "2024-01-01T00:00:00Z"
                }]
            }"#,
        )
        .unwrap();
        assert!(document.migrate());
        assert_eq!(document.next_credential_id, 10);
    }
}
