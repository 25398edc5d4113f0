//! Master-password policy and plaintext password utilities.
//!
//! The strength score is UI feedback only; acceptance is gated solely by
//! the length minimums. Setup requires 8 characters while the destructive
//! reset path requires 6; the asymmetry is inherited and kept on purpose.

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::error::{Result, VaultError};

/// Minimum master-password length for initial vault setup.
pub const SETUP_MIN_PASSWORD_LEN: usize = 8;

/// Minimum master-password length for the forgot-password reset path.
pub const RESET_MIN_PASSWORD_LEN: usize = 6;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Validate a candidate master password against a length minimum.
///
/// # Errors
///
/// Returns `VaultError::InvalidInput` when the candidate is empty,
/// whitespace-only, or shorter than `min_len` characters.
pub fn validate_master_password(candidate: &str, min_len: usize) -> Result<()> {
    if candidate.trim().is_empty() {
        return Err(VaultError::InvalidInput(
            "Master password cannot be empty".to_string(),
        ));
    }
    if candidate.chars().count() < min_len {
        return Err(VaultError::InvalidInput(format!(
            "Master password must be at least {} characters",
            min_len
        )));
    }
    Ok(())
}

/// Score a candidate password from 0 to 100 by length and character-class
/// diversity. Informational only; never gates acceptance.
pub fn password_strength(candidate: &str) -> u8 {
    let mut strength: u32 = 0;

    let len = candidate.chars().count();
    if len >= 8 {
        strength += 20;
    }
    if len >= 12 {
        strength += 10;
    }
    if len >= 16 {
        strength += 10;
    }
    if candidate.chars().any(|c| c.is_ascii_lowercase()) {
        strength += 15;
    }
    if candidate.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 15;
    }
    if candidate.chars().any(|c| c.is_ascii_digit()) {
        strength += 15;
    }
    if candidate.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 15;
    }

    strength.min(100) as u8
}

/// Options for [`generate_password`].
#[derive(Debug, Clone)]
pub struct PasswordSpec {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for PasswordSpec {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Generate a random password from the selected character classes.
///
/// An empty selection falls back to lowercase letters and digits.
/// Uses the operating system CSPRNG.
pub fn generate_password(spec: &PasswordSpec) -> String {
    let mut charset = String::new();
    if spec.lowercase {
        charset.push_str(LOWERCASE);
    }
    if spec.uppercase {
        charset.push_str(UPPERCASE);
    }
    if spec.digits {
        charset.push_str(DIGITS);
    }
    if spec.symbols {
        charset.push_str(SYMBOLS);
    }
    if charset.is_empty() {
        charset.push_str(LOWERCASE);
        charset.push_str(DIGITS);
    }

    let chars: Vec<char> = charset.chars().collect();
    let mut random = vec![0u8; spec.length];
    OsRng.fill_bytes(&mut random);

    random
        .into_iter()
        .map(|b| chars[b as usize % chars.len()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_length_minimums() {
        assert!(validate_master_password("12345678", SETUP_MIN_PASSWORD_LEN).is_ok());
        assert!(validate_master_password("1234567", SETUP_MIN_PASSWORD_LEN).is_err());
        assert!(validate_master_password("123456", RESET_MIN_PASSWORD_LEN).is_ok());
        assert!(validate_master_password("12345", RESET_MIN_PASSWORD_LEN).is_err());
    }

    #[test]
    fn test_validate_rejects_whitespace_only() {
        assert!(validate_master_password("        ", SETUP_MIN_PASSWORD_LEN).is_err());
        assert!(validate_master_password("", RESET_MIN_PASSWORD_LEN).is_err());
    }

    #[test]
    fn test_strength_scoring() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 15);
        assert_eq!(password_strength("abcdefgh"), 35);
        assert_eq!(password_strength("Secret123!"), 80);
        assert_eq!(password_strength("Secret123!Secret"), 100);
    }

    #[test]
    fn test_strength_caps_at_100() {
        assert_eq!(password_strength(&"Aa1!".repeat(20)), 100);
    }

    #[test]
    fn test_generate_respects_length() {
        let spec = PasswordSpec {
            length: 24,
            ..PasswordSpec::default()
        };
        assert_eq!(generate_password(&spec).chars().count(), 24);
    }

    #[test]
    fn test_generate_respects_charset() {
        let spec = PasswordSpec {
            length: 64,
            lowercase: true,
            uppercase: false,
            digits: true,
            symbols: false,
        };
        let password = generate_password(&spec);
        assert!(password
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_empty_selection_falls_back() {
        let spec = PasswordSpec {
            length: 32,
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
        };
        let password = generate_password(&spec);
        assert!(password
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
