//! The login session: a verified master key bound to a running process.
//!
//! `VaultSession` is the only type that holds key material, and every
//! encrypt/decrypt goes through it. Sessions are explicit values rather
//! than ambient globals, so tests can run several isolated vaults side by
//! side. Dropping (or [`VaultSession::lock`]-ing) a session zeroizes the
//! key; stored data is untouched and a fresh login brings it back.
//!
//! ## Password rotation
//!
//! `change_password` re-encrypts every stored secret under a new key.
//! The whole protocol runs against in-memory state and commits through
//! one atomic store write: if any record fails to decrypt under the
//! current key the rotation aborts with nothing persisted, and a crash
//! at any point leaves the vault entirely pre- or entirely
//! post-rotation. The session key is write-locked for the duration, so
//! no decrypt can race the swap.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::crypto::{
    decrypt_secret, derive_key, encrypt_secret, generate_salt, hash_master_password,
    validate_master_password, MasterKey, RESET_MIN_PASSWORD_LEN, SETUP_MIN_PASSWORD_LEN,
};
use crate::error::{Result, VaultError};
use crate::store::{
    CredentialFilter, CredentialStore, CredentialSummary, CredentialUpdate, LoginType,
    MasterCredential, NewCredential,
};

/// A credential as supplied by the application layer, secret in
/// plaintext. The session encrypts before anything reaches the store.
#[derive(Debug, Clone, Default)]
pub struct CredentialInput {
    pub software_name: String,
    pub username: Option<String>,
    pub login_type: LoginType,
    /// Plaintext secret; required for `password` credentials and
    /// rejected for the other login types.
    pub secret: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Partial update from the application layer; `None` fields are
/// untouched. A blank `category` means "no change".
#[derive(Debug, Clone, Default)]
pub struct CredentialChanges {
    pub software_name: Option<String>,
    pub username: Option<String>,
    pub login_type: Option<LoginType>,
    pub secret: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// A fully decrypted credential, as produced by [`VaultSession::export_all`].
#[derive(Debug, Clone, Serialize)]
pub struct ExportedCredential {
    pub id: u64,
    pub software_name: String,
    pub username: Option<String>,
    pub login_type: LoginType,
    pub secret: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An authenticated vault session holding the derived master key.
pub struct VaultSession {
    store: Arc<CredentialStore>,
    key: RwLock<MasterKey>,
}

impl VaultSession {
    /// Initialize a brand-new vault and enter a session.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if a master credential exists, or
    /// `InvalidInput` if the password is shorter than
    /// [`SETUP_MIN_PASSWORD_LEN`] characters.
    pub fn setup(store: Arc<CredentialStore>, password: &str) -> Result<Self> {
        validate_master_password(password, SETUP_MIN_PASSWORD_LEN)?;
        if store.has_master_credential()? {
            return Err(VaultError::AlreadyInitialized);
        }

        let salt = generate_salt();
        let verifier = hash_master_password(password, &salt);
        store.create_master_credential(&verifier, &salt)?;

        let key = derive_key(password, &salt);
        info!("vault initialized");
        Ok(Self {
            store,
            key: RwLock::new(key),
        })
    }

    /// Verify the master password against the stored verifier and enter
    /// a session.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if no vault exists, or
    /// `IncorrectPassword` on verification failure, with no further
    /// detail, by design.
    pub fn login(store: Arc<CredentialStore>, password: &str) -> Result<Self> {
        let master = store
            .get_master_credential()?
            .ok_or(VaultError::NotInitialized)?;
        verify_password(&master, password)?;

        let key = derive_key(password, &master.salt);
        info!("login succeeded");
        Ok(Self {
            store,
            key: RwLock::new(key),
        })
    }

    /// Forgot-password path: destroy every stored record, replace the
    /// master credential, and enter a session under the new password.
    /// Irreversible; the old secrets are gone.
    ///
    /// The reduced [`RESET_MIN_PASSWORD_LEN`] minimum applies here.
    pub fn reset(store: Arc<CredentialStore>, new_password: &str) -> Result<Self> {
        validate_master_password(new_password, RESET_MIN_PASSWORD_LEN)?;
        if !store.has_master_credential()? {
            return Err(VaultError::NotInitialized);
        }

        let salt = generate_salt();
        let verifier = hash_master_password(new_password, &salt);
        store.reset_master_credential(&verifier, &salt)?;

        let key = derive_key(new_password, &salt);
        warn!("vault reset; previous records destroyed");
        Ok(Self {
            store,
            key: RwLock::new(key),
        })
    }

    /// The store this session operates on.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Discard the session and zeroize the key. Stored data is
    /// untouched; logging in again restores access.
    pub fn lock(self) {
        drop(self);
    }

    // --- Credential operations ---

    /// Encrypt and store a new credential; returns its id.
    pub fn add_credential(&self, input: CredentialInput) -> Result<u64> {
        let encrypted_secret = match (input.login_type, input.secret) {
            (LoginType::Password, Some(secret)) => Some(self.encrypt(&secret)?),
            (LoginType::Password, None) => {
                return Err(VaultError::InvalidInput(
                    "a secret is required for password credentials".to_string(),
                ));
            }
            (_, Some(_)) => {
                return Err(VaultError::InvalidInput(
                    "only password credentials store a secret".to_string(),
                ));
            }
            (_, None) => None,
        };

        self.store.add_credential(NewCredential {
            software_name: input.software_name,
            username: input.username,
            login_type: input.login_type,
            encrypted_secret,
            phone_number: input.phone_number,
            email_address: input.email_address,
            url: input.url,
            notes: input.notes,
            category: input.category,
        })
    }

    /// List credentials (payload excluded), newest-updated first.
    pub fn list_credentials(&self, filter: &CredentialFilter) -> Result<Vec<CredentialSummary>> {
        self.store.get_credentials(filter)
    }

    /// Decrypt and return the secret of a password credential.
    pub fn reveal_secret(&self, id: u64) -> Result<String> {
        let record = self
            .store
            .get_credential_by_id(id)?
            .ok_or(VaultError::CredentialNotFound(id))?;
        let sealed = record.encrypted_secret.ok_or_else(|| {
            VaultError::InvalidInput("credential does not store an encrypted secret".to_string())
        })?;

        let key = self.read_key()?;
        decrypt_secret(&sealed, &key)
    }

    /// Apply a partial update, encrypting a new secret if one is given.
    ///
    /// Changing `login_type` away from `password` clears the stored
    /// payload; supplying a secret for a non-password result is
    /// rejected.
    pub fn update_credential(&self, id: u64, changes: CredentialChanges) -> Result<()> {
        let record = self
            .store
            .get_credential_by_id(id)?
            .ok_or(VaultError::CredentialNotFound(id))?;

        let effective_type = changes.login_type.unwrap_or(record.login_type);
        let encrypted_secret = match changes.secret {
            Some(secret) if effective_type == LoginType::Password => Some(self.encrypt(&secret)?),
            Some(_) => {
                return Err(VaultError::InvalidInput(
                    "only password credentials store a secret".to_string(),
                ));
            }
            None => None,
        };

        self.store.update_credential(
            id,
            CredentialUpdate {
                software_name: changes.software_name,
                username: changes.username,
                login_type: changes.login_type,
                encrypted_secret,
                phone_number: changes.phone_number,
                email_address: changes.email_address,
                url: changes.url,
                notes: changes.notes,
                category: changes.category,
            },
        )
    }

    /// Delete a credential. Idempotent.
    pub fn delete_credential(&self, id: u64) -> Result<()> {
        self.store.delete_credential(id)
    }

    /// Delete every credential record. Refused unless the vault's
    /// `dangerous.allow_clear_all` setting is enabled.
    pub fn clear_all(&self) -> Result<()> {
        if !self.store.config()?.dangerous.allow_clear_all {
            return Err(VaultError::InvalidInput(
                "clear-all is disabled in vault settings".to_string(),
            ));
        }
        self.store.clear_all_credentials()
    }

    /// Decrypt every credential for export.
    ///
    /// Records whose payload fails to decrypt are skipped with a
    /// warning rather than failing the whole export; the strict
    /// all-or-nothing treatment is reserved for rotation.
    pub fn export_all(&self) -> Result<Vec<ExportedCredential>> {
        let key = self.read_key()?;
        let mut exported = Vec::new();
        for record in self.store.all_credentials()? {
            let secret = match &record.encrypted_secret {
                Some(sealed) => match decrypt_secret(sealed, &key) {
                    Ok(plaintext) => Some(plaintext),
                    Err(_) => {
                        warn!(id = record.id, "skipping record that failed to decrypt");
                        continue;
                    }
                },
                None => None,
            };
            exported.push(ExportedCredential {
                id: record.id,
                software_name: record.software_name,
                username: record.username,
                login_type: record.login_type,
                secret,
                phone_number: record.phone_number,
                email_address: record.email_address,
                url: record.url,
                notes: record.notes,
                category: record.category,
                created_at: record.created_at,
                updated_at: record.updated_at,
            });
        }
        Ok(exported)
    }

    /// Rotate the master password, re-encrypting every stored secret.
    ///
    /// The protocol: verify the old password; decrypt every record under
    /// the current key; derive a fresh salt, verifier, and key;
    /// re-encrypt everything; commit the new master credential and all
    /// re-encrypted records in one atomic store write; rebind the
    /// session key.
    ///
    /// # Errors
    ///
    /// `IncorrectPassword` if the old password does not verify;
    /// `RotationFailed` if any record cannot be re-encrypted; in that
    /// case nothing has been persisted and the old password remains
    /// authoritative.
    pub fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        validate_master_password(new_password, SETUP_MIN_PASSWORD_LEN)?;
        let master = self
            .store
            .get_master_credential()?
            .ok_or(VaultError::NotInitialized)?;
        verify_password(&master, old_password)?;

        // Hold the write lock through the commit so no decrypt observes
        // a half-rotated key.
        let mut key = self
            .key
            .write()
            .map_err(|_| VaultError::Other("session key lock poisoned".to_string()))?;

        let mut records = self.store.all_credentials()?;
        info!(records = records.len(), "password rotation started");

        let mut plaintexts: Vec<(usize, String)> = Vec::new();
        for (index, record) in records.iter().enumerate() {
            if let Some(sealed) = &record.encrypted_secret {
                let plaintext = decrypt_secret(sealed, &key).map_err(|_| {
                    VaultError::RotationFailed(format!(
                        "credential {} could not be decrypted under the current key; \
                         aborting with no changes",
                        record.id
                    ))
                })?;
                plaintexts.push((index, plaintext));
            }
        }

        let new_salt = generate_salt();
        let new_verifier = hash_master_password(new_password, &new_salt);
        let new_key = derive_key(new_password, &new_salt);

        for (index, plaintext) in plaintexts.iter_mut() {
            let sealed = encrypt_secret(plaintext, &new_key).map_err(|_| {
                VaultError::RotationFailed(format!(
                    "credential {} could not be re-encrypted; aborting with no changes",
                    records[*index].id
                ))
            })?;
            records[*index].encrypted_secret = Some(sealed);
            plaintext.zeroize();
        }

        self.store
            .commit_rotation(&new_verifier, &new_salt, records)?;
        *key = new_key;
        info!("password rotation committed");
        Ok(())
    }

    fn encrypt(&self, plaintext: &str) -> Result<crate::crypto::EncryptedSecret> {
        let key = self.read_key()?;
        encrypt_secret(plaintext, &key)
    }

    fn read_key(&self) -> Result<std::sync::RwLockReadGuard<'_, MasterKey>> {
        self.key
            .read()
            .map_err(|_| VaultError::Other("session key lock poisoned".to_string()))
    }
}

/// Constant-time verifier comparison. Both sides are fixed-length hex,
/// so byte equality is well-defined; `ct_eq` keeps the comparison from
/// short-circuiting on the first mismatched byte.
fn verify_password(master: &MasterCredential, password: &str) -> Result<()> {
    let computed = hash_master_password(password, &master.salt);
    let matches: bool = computed
        .as_bytes()
        .ct_eq(master.verifier_hash.as_bytes())
        .into();
    if matches {
        Ok(())
    } else {
        Err(VaultError::IncorrectPassword)
    }
}
