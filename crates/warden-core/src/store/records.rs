//! Core data types for the stored vault collections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::EncryptedSecret;

/// Sentinel category assigned when a record is created without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Wildcard category that bypasses category filtering.
pub const ALL_CATEGORIES: &str = "All";

/// How a credential is used to log in, which determines the
/// secret-bearing field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginType {
    /// An encrypted password is stored.
    #[default]
    Password,
    /// Login happens via SMS code; only a phone number is kept.
    SmsCode,
    /// Login happens via emailed code/link; only an address is kept.
    Email,
}

/// The vault's one master credential: verifier hash + salt, never the
/// password itself and never the encryption key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterCredential {
    /// Stored login verifier (64-char hex, PBKDF2 output).
    pub verifier_hash: String,

    /// Per-vault random salt (64-char hex). Replaced wholesale on
    /// password change and reset.
    pub salt: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored credential record, encrypted payload included.
///
/// Only the secret is protected; the display metadata is plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Monotonically assigned, never reused.
    pub id: u64,

    /// Display label, required and non-empty.
    pub software_name: String,

    #[serde(default)]
    pub username: Option<String>,

    /// Defaults to `password` for records predating the field.
    #[serde(default)]
    pub login_type: LoginType,

    /// Present only when `login_type` is `password`.
    #[serde(default)]
    pub encrypted_secret: Option<EncryptedSecret>,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub email_address: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Never empty; blank input is normalized to [`UNCATEGORIZED`].
    pub category: String,

    pub created_at: DateTime<Utc>,

    /// Refreshed on every field mutation.
    pub updated_at: DateTime<Utc>,
}

/// A credential as returned by list views: everything except the
/// encrypted payload.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialSummary {
    pub id: u64,
    pub software_name: String,
    pub username: Option<String>,
    pub login_type: LoginType,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CredentialRecord> for CredentialSummary {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            id: record.id,
            software_name: record.software_name.clone(),
            username: record.username.clone(),
            login_type: record.login_type,
            phone_number: record.phone_number.clone(),
            email_address: record.email_address.clone(),
            url: record.url.clone(),
            notes: record.notes.clone(),
            category: record.category.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Builder for creating new credential records at the store layer.
///
/// The secret arrives already encrypted; plaintext never reaches the
/// store.
#[derive(Debug, Clone, Default)]
pub struct NewCredential {
    pub software_name: String,
    pub username: Option<String>,
    pub login_type: LoginType,
    pub encrypted_secret: Option<EncryptedSecret>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    /// `None` or blank becomes [`UNCATEGORIZED`].
    pub category: Option<String>,
}

/// Partial update for an existing record. `None` fields are untouched.
///
/// A blank `category` means "no change", deliberately asymmetric with
/// creation, where blank means [`UNCATEGORIZED`].
#[derive(Debug, Clone, Default)]
pub struct CredentialUpdate {
    pub software_name: Option<String>,
    pub username: Option<String>,
    pub login_type: Option<LoginType>,
    pub encrypted_secret: Option<EncryptedSecret>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Filter for list views.
#[derive(Debug, Clone, Default)]
pub struct CredentialFilter {
    /// Case-insensitive substring match over name, username, and url.
    pub search: Option<String>,
    /// Exact category match; [`ALL_CATEGORIES`] bypasses the filter.
    pub category: Option<String>,
}
