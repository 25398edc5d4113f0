//! Persistence and lifecycle of the master credential and credential
//! records.
//!
//! `CredentialStore` sits in front of a [`VaultBackend`] and enforces the
//! security-relevant invariants: the master credential stays a singleton,
//! categories are never stored blank, record ids are never reused, and
//! every mutation is a serialized load → mutate → save of the whole
//! document so concurrent callers can never interleave at a finer
//! granularity than a full-document swap.

use std::sync::Mutex;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Result, VaultError};
use crate::store::backend::VaultBackend;
use crate::store::document::{VaultConfig, VaultDocument};
use crate::store::records::{
    CredentialFilter, CredentialRecord, CredentialSummary, CredentialUpdate, LoginType,
    MasterCredential, NewCredential, ALL_CATEGORIES, UNCATEGORIZED,
};

/// The vault's record store. All operations are synchronous and
/// serialized; the store is `Send + Sync` and safe to share behind an
/// `Arc`.
pub struct CredentialStore {
    backend: Mutex<Box<dyn VaultBackend>>,
}

impl CredentialStore {
    /// Open a store over the given backend, migrating the stored
    /// document to the current format if needed.
    pub fn open(backend: Box<dyn VaultBackend>) -> Result<Self> {
        let store = Self {
            backend: Mutex::new(backend),
        };
        // mutate() persists unconditionally, which writes back any
        // migration its load applied.
        store.mutate(|_| Ok(()))?;
        Ok(store)
    }

    /// Convenience constructor over an in-memory backend.
    pub fn in_memory() -> Result<Self> {
        Self::open(Box::new(super::backend::MemoryBackend::new()))
    }

    /// Run a read-only closure over the current document.
    fn read<T>(&self, f: impl FnOnce(&VaultDocument) -> Result<T>) -> Result<T> {
        let backend = self
            .backend
            .lock()
            .map_err(|_| VaultError::Other("vault store lock poisoned".to_string()))?;
        let mut document = backend.load()?;
        document.migrate();
        f(&document)
    }

    /// Run a mutating closure over the document and persist the result.
    /// The backend lock is held for the whole read-modify-write, which is
    /// what rules out lost updates between concurrent callers.
    fn mutate<T>(&self, f: impl FnOnce(&mut VaultDocument) -> Result<T>) -> Result<T> {
        let mut backend = self
            .backend
            .lock()
            .map_err(|_| VaultError::Other("vault store lock poisoned".to_string()))?;
        let mut document = backend.load()?;
        document.migrate();
        let value = f(&mut document)?;
        backend.save(&document)?;
        Ok(value)
    }

    // --- Master credential ---

    pub fn has_master_credential(&self) -> Result<bool> {
        self.read(|document| Ok(document.master.is_some()))
    }

    /// Create the singleton master credential.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::AlreadyInitialized` if one exists; reaching
    /// that is a call-sequence bug in the layer above.
    pub fn create_master_credential(&self, verifier_hash: &str, salt: &str) -> Result<()> {
        self.mutate(|document| {
            if document.master.is_some() {
                return Err(VaultError::AlreadyInitialized);
            }
            let now = Utc::now();
            document.master = Some(MasterCredential {
                verifier_hash: verifier_hash.to_string(),
                salt: salt.to_string(),
                created_at: now,
                updated_at: now,
            });
            info!("master credential created");
            Ok(())
        })
    }

    pub fn get_master_credential(&self) -> Result<Option<MasterCredential>> {
        self.read(|document| Ok(document.master.clone()))
    }

    /// Overwrite the verifier hash and salt on the existing singleton.
    /// Used after a verified password change.
    pub fn update_master_credential_secret(&self, verifier_hash: &str, salt: &str) -> Result<()> {
        self.mutate(|document| {
            let master = document.master.as_mut().ok_or(VaultError::NotInitialized)?;
            master.verifier_hash = verifier_hash.to_string();
            master.salt = salt.to_string();
            master.updated_at = Utc::now();
            Ok(())
        })
    }

    /// Forgot-password path: destroy every credential record and replace
    /// the master credential wholesale, in one atomic save. Explicitly
    /// irreversible, with no escrow to recover the old secrets.
    pub fn reset_master_credential(&self, verifier_hash: &str, salt: &str) -> Result<()> {
        self.mutate(|document| {
            let dropped = document.credentials.len();
            document.credentials.clear();
            let now = Utc::now();
            document.master = Some(MasterCredential {
                verifier_hash: verifier_hash.to_string(),
                salt: salt.to_string(),
                created_at: now,
                updated_at: now,
            });
            warn!(dropped, "master credential reset; all records destroyed");
            Ok(())
        })
    }

    /// Atomically commit a completed password rotation: the new verifier
    /// and salt plus every re-encrypted record land in a single save.
    ///
    /// Until this call returns, the old master credential and the old
    /// ciphertexts remain the authoritative state on disk; a crash
    /// beforehand loses nothing.
    pub fn commit_rotation(
        &self,
        verifier_hash: &str,
        salt: &str,
        records: Vec<CredentialRecord>,
    ) -> Result<()> {
        self.mutate(|document| {
            let master = document.master.as_mut().ok_or(VaultError::NotInitialized)?;
            let now = Utc::now();
            master.verifier_hash = verifier_hash.to_string();
            master.salt = salt.to_string();
            master.updated_at = now;

            document.credentials = records;
            for record in &mut document.credentials {
                if record.encrypted_secret.is_some() {
                    record.updated_at = now;
                }
            }
            info!(
                records = document.credentials.len(),
                "password rotation committed"
            );
            Ok(())
        })
    }

    // --- Credential records ---

    /// Insert a new record and return its id.
    pub fn add_credential(&self, new: NewCredential) -> Result<u64> {
        if new.software_name.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "software name is required".to_string(),
            ));
        }
        self.mutate(|document| {
            let id = document.next_credential_id;
            document.next_credential_id += 1;

            let category = match new.category.as_deref() {
                None | Some("") => UNCATEGORIZED.to_string(),
                Some(name) => name.to_string(),
            };

            let now = Utc::now();
            document.credentials.push(CredentialRecord {
                id,
                software_name: new.software_name,
                username: new.username,
                login_type: new.login_type,
                encrypted_secret: new.encrypted_secret,
                phone_number: new.phone_number,
                email_address: new.email_address,
                url: new.url,
                notes: new.notes,
                category,
                created_at: now,
                updated_at: now,
            });
            Ok(id)
        })
    }

    /// List records matching the filter, newest-updated first, with the
    /// encrypted payload stripped.
    pub fn get_credentials(&self, filter: &CredentialFilter) -> Result<Vec<CredentialSummary>> {
        self.read(|document| {
            let mut records: Vec<&CredentialRecord> = document
                .credentials
                .iter()
                .filter(|record| matches_filter(record, filter))
                .collect();
            records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(records.into_iter().map(CredentialSummary::from).collect())
        })
    }

    /// Fetch a single record including its encrypted payload. Reserved
    /// for decrypt paths; list views go through [`Self::get_credentials`].
    pub fn get_credential_by_id(&self, id: u64) -> Result<Option<CredentialRecord>> {
        self.read(|document| {
            Ok(document
                .credentials
                .iter()
                .find(|record| record.id == id)
                .cloned())
        })
    }

    /// Every record with payload, newest-updated first. Used by export
    /// and by the rotation protocol.
    pub fn all_credentials(&self) -> Result<Vec<CredentialRecord>> {
        self.read(|document| {
            let mut records = document.credentials.clone();
            records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(records)
        })
    }

    /// Apply a partial update to an existing record.
    ///
    /// Fields left `None` are untouched. A blank `category` is "no
    /// change". Moving `login_type` away from `password` clears the
    /// stored payload so stale ciphertext cannot linger.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::CredentialNotFound` if the id does not exist.
    pub fn update_credential(&self, id: u64, update: CredentialUpdate) -> Result<()> {
        self.mutate(|document| {
            let record = document
                .credentials
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or(VaultError::CredentialNotFound(id))?;

            if let Some(software_name) = update.software_name {
                if software_name.trim().is_empty() {
                    return Err(VaultError::InvalidInput(
                        "software name is required".to_string(),
                    ));
                }
                record.software_name = software_name;
            }
            if let Some(username) = update.username {
                record.username = Some(username);
            }
            if let Some(login_type) = update.login_type {
                record.login_type = login_type;
                if login_type != LoginType::Password {
                    record.encrypted_secret = None;
                }
            }
            if let Some(sealed) = update.encrypted_secret {
                record.encrypted_secret = Some(sealed);
            }
            if let Some(phone_number) = update.phone_number {
                record.phone_number = Some(phone_number);
            }
            if let Some(email_address) = update.email_address {
                record.email_address = Some(email_address);
            }
            if let Some(url) = update.url {
                record.url = Some(url);
            }
            if let Some(notes) = update.notes {
                record.notes = Some(notes);
            }
            if let Some(category) = update.category {
                if !category.is_empty() {
                    record.category = category;
                }
            }

            record.updated_at = Utc::now();
            Ok(())
        })
    }

    /// Delete a record. Idempotent: deleting a nonexistent id succeeds.
    pub fn delete_credential(&self, id: u64) -> Result<()> {
        self.mutate(|document| {
            document.credentials.retain(|record| record.id != id);
            Ok(())
        })
    }

    /// Delete every credential record. The master credential and the id
    /// counter are untouched.
    pub fn clear_all_credentials(&self) -> Result<()> {
        self.mutate(|document| {
            let dropped = document.credentials.len();
            document.credentials.clear();
            warn!(dropped, "all credential records cleared");
            Ok(())
        })
    }

    // --- Categories ---

    pub fn list_categories(&self) -> Result<Vec<String>> {
        self.read(|document| Ok(document.categories.clone()))
    }

    /// Add a category name. Adding an existing name is a no-op.
    pub fn add_category(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "category name is required".to_string(),
            ));
        }
        self.mutate(|document| {
            if !document.categories.iter().any(|c| c == name) {
                document.categories.push(name.to_string());
            }
            Ok(())
        })
    }

    /// Remove a category; records carrying it move to `Uncategorized`.
    /// Removing an unknown name is a no-op.
    pub fn remove_category(&self, name: &str) -> Result<()> {
        self.mutate(|document| {
            document.categories.retain(|c| c != name);
            let now = Utc::now();
            for record in &mut document.credentials {
                if record.category == name {
                    record.category = UNCATEGORIZED.to_string();
                    record.updated_at = now;
                }
            }
            Ok(())
        })
    }

    /// Rename a category and relabel every record carrying it. Renaming
    /// an unknown name is a no-op.
    pub fn rename_category(&self, old_name: &str, new_name: &str) -> Result<()> {
        if new_name.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "category name is required".to_string(),
            ));
        }
        self.mutate(|document| {
            let Some(slot) = document.categories.iter_mut().find(|c| *c == old_name) else {
                return Ok(());
            };
            *slot = new_name.to_string();
            let now = Utc::now();
            for record in &mut document.credentials {
                if record.category == old_name {
                    record.category = new_name.to_string();
                    record.updated_at = now;
                }
            }
            Ok(())
        })
    }

    // --- Config ---

    pub fn config(&self) -> Result<VaultConfig> {
        self.read(|document| Ok(document.config.clone()))
    }

    pub fn update_config(&self, config: VaultConfig) -> Result<()> {
        self.mutate(|document| {
            document.config = config;
            Ok(())
        })
    }
}

fn matches_filter(record: &CredentialRecord, filter: &CredentialFilter) -> bool {
    if let Some(search) = filter.search.as_deref() {
        if !search.is_empty() {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(record.software_name.as_str()),
                record.username.as_deref(),
                record.url.as_deref(),
            ];
            let hit = haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
    }
    if let Some(category) = filter.category.as_deref() {
        if !category.is_empty() && category != ALL_CATEGORIES && record.category != category {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::in_memory().unwrap()
    }

    fn named(software_name: &str) -> NewCredential {
        NewCredential {
            software_name: software_name.to_string(),
            ..NewCredential::default()
        }
    }

    #[test]
    fn test_master_credential_is_singleton() {
        let store = store();
        assert!(!store.has_master_credential().unwrap());
        store.create_master_credential("hash", "salt").unwrap();
        assert!(store.has_master_credential().unwrap());
        assert!(matches!(
            store.create_master_credential("hash2", "salt2"),
            Err(VaultError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_update_master_requires_existing() {
        let store = store();
        assert!(matches!(
            store.update_master_credential_secret("hash", "salt"),
            Err(VaultError::NotInitialized)
        ));

        store.create_master_credential("hash", "salt").unwrap();
        store
            .update_master_credential_secret("hash2", "salt2")
            .unwrap();
        let master = store.get_master_credential().unwrap().unwrap();
        assert_eq!(master.verifier_hash, "hash2");
        assert_eq!(master.salt, "salt2");
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let store = store();
        let a = store.add_credential(named("a")).unwrap();
        let b = store.add_credential(named("b")).unwrap();
        assert!(b > a);

        store.delete_credential(b).unwrap();
        let c = store.add_credential(named("c")).unwrap();
        assert!(c > b);

        store.clear_all_credentials().unwrap();
        let d = store.add_credential(named("d")).unwrap();
        assert!(d > c);
    }

    #[test]
    fn test_empty_software_name_rejected() {
        let store = store();
        assert!(matches!(
            store.add_credential(named("   ")),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_category_defaults_on_create() {
        let store = store();
        let id = store.add_credential(named("GitHub")).unwrap();
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, UNCATEGORIZED);

        let id = store
            .add_credential(NewCredential {
                software_name: "Bank".to_string(),
                category: Some(String::new()),
                ..NewCredential::default()
            })
            .unwrap();
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, UNCATEGORIZED);
    }

    #[test]
    fn test_blank_category_means_no_change_on_update() {
        let store = store();
        let id = store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                category: Some("Work".to_string()),
                ..NewCredential::default()
            })
            .unwrap();

        store
            .update_credential(
                id,
                CredentialUpdate {
                    category: Some(String::new()),
                    ..CredentialUpdate::default()
                },
            )
            .unwrap();
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, "Work");

        store
            .update_credential(
                id,
                CredentialUpdate {
                    category: Some("Banking".to_string()),
                    ..CredentialUpdate::default()
                },
            )
            .unwrap();
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, "Banking");
    }

    #[test]
    fn test_update_unknown_id_fails() {
        let store = store();
        assert!(matches!(
            store.update_credential(99, CredentialUpdate::default()),
            Err(VaultError::CredentialNotFound(99))
        ));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = store();
        assert!(store.delete_credential(99).is_ok());
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_username_url() {
        let store = store();
        store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                username: Some("octocat".to_string()),
                url: Some("https://github.com".to_string()),
                ..NewCredential::default()
            })
            .unwrap();
        store.add_credential(named("Bank")).unwrap();

        for needle in ["github", "OCTO", "hub.com"] {
            let found = store
                .get_credentials(&CredentialFilter {
                    search: Some(needle.to_string()),
                    ..CredentialFilter::default()
                })
                .unwrap();
            assert_eq!(found.len(), 1, "search {needle:?}");
            assert_eq!(found[0].software_name, "GitHub");
        }
    }

    #[test]
    fn test_category_filter_with_wildcard() {
        let store = store();
        store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                category: Some("Work".to_string()),
                ..NewCredential::default()
            })
            .unwrap();
        store.add_credential(named("Bank")).unwrap();

        let work = store
            .get_credentials(&CredentialFilter {
                category: Some("Work".to_string()),
                ..CredentialFilter::default()
            })
            .unwrap();
        assert_eq!(work.len(), 1);

        let all = store
            .get_credentials(&CredentialFilter {
                category: Some(ALL_CATEGORIES.to_string()),
                ..CredentialFilter::default()
            })
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_listing_orders_by_updated_at_descending() {
        let store = store();
        let first = store.add_credential(named("first")).unwrap();
        let _second = store.add_credential(named("second")).unwrap();

        // Touch the older record; it should move to the front.
        store
            .update_credential(
                first,
                CredentialUpdate {
                    notes: Some("touched".to_string()),
                    ..CredentialUpdate::default()
                },
            )
            .unwrap();

        let listed = store.get_credentials(&CredentialFilter::default()).unwrap();
        assert_eq!(listed[0].id, first);
    }

    #[test]
    fn test_login_type_change_clears_payload() {
        let store = store();
        let id = store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                encrypted_secret: Some(crate::crypto::EncryptedSecret {
                    ciphertext: "aa".to_string(),
                    nonce: "bb".to_string(),
                    auth_tag: "cc".to_string(),
                }),
                ..NewCredential::default()
            })
            .unwrap();

        store
            .update_credential(
                id,
                CredentialUpdate {
                    login_type: Some(LoginType::SmsCode),
                    phone_number: Some("+15551234567".to_string()),
                    ..CredentialUpdate::default()
                },
            )
            .unwrap();

        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.login_type, LoginType::SmsCode);
        assert!(record.encrypted_secret.is_none());
    }

    #[test]
    fn test_clear_all_keeps_master() {
        let store = store();
        store.create_master_credential("hash", "salt").unwrap();
        store.add_credential(named("GitHub")).unwrap();

        store.clear_all_credentials().unwrap();
        assert!(store
            .get_credentials(&CredentialFilter::default())
            .unwrap()
            .is_empty());
        assert!(store.has_master_credential().unwrap());
    }

    #[test]
    fn test_reset_destroys_records_and_replaces_master() {
        let store = store();
        store.create_master_credential("hash", "salt").unwrap();
        store.add_credential(named("GitHub")).unwrap();

        store.reset_master_credential("hash2", "salt2").unwrap();
        assert!(store
            .get_credentials(&CredentialFilter::default())
            .unwrap()
            .is_empty());
        let master = store.get_master_credential().unwrap().unwrap();
        assert_eq!(master.verifier_hash, "hash2");
        assert_eq!(master.salt, "salt2");
    }

    #[test]
    fn test_remove_category_reassigns_records() {
        let store = store();
        let id = store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                category: Some("Work".to_string()),
                ..NewCredential::default()
            })
            .unwrap();

        store.remove_category("Work").unwrap();
        assert!(!store
            .list_categories()
            .unwrap()
            .contains(&"Work".to_string()));
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, UNCATEGORIZED);
    }

    #[test]
    fn test_rename_category_relabels_records() {
        let store = store();
        let id = store
            .add_credential(NewCredential {
                software_name: "GitHub".to_string(),
                category: Some("Work".to_string()),
                ..NewCredential::default()
            })
            .unwrap();

        store.rename_category("Work", "Office").unwrap();
        assert!(store
            .list_categories()
            .unwrap()
            .contains(&"Office".to_string()));
        let record = store.get_credential_by_id(id).unwrap().unwrap();
        assert_eq!(record.category, "Office");
    }

    #[test]
    fn test_add_category_deduplicates() {
        let store = store();
        let before = store.list_categories().unwrap().len();
        store.add_category("Gaming").unwrap();
        store.add_category("Gaming").unwrap();
        assert_eq!(store.list_categories().unwrap().len(), before + 1);
    }

    #[test]
    fn test_config_round_trip() {
        let store = store();
        let mut config = store.config().unwrap();
        assert!(!config.dangerous.allow_clear_all);
        config.dangerous.allow_clear_all = true;
        store.update_config(config).unwrap();
        assert!(store.config().unwrap().dangerous.allow_clear_all);
    }
}
