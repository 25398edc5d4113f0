//! Input handling helpers for master-password prompts.

use std::io::IsTerminal;

use anyhow::bail;
use dialoguer::Password;
use secrecy::SecretString;
use warden_core::crypto::validate_master_password;

/// Prompt for the master password, or read it from `WARDEN_PASSWORD`.
pub fn prompt_password(prompt: &str) -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var("WARDEN_PASSWORD") {
        if !value.trim().is_empty() {
            return Ok(SecretString::from(value));
        }
    }
    if !std::io::stdin().is_terminal() {
        bail!("no master password provided and no TTY available. Set WARDEN_PASSWORD.");
    }
    let value = Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| anyhow::anyhow!("failed to read password: {}", e))?;
    Ok(SecretString::from(value))
}

/// Prompt for a new master password with confirmation, enforcing the
/// given length minimum. `WARDEN_NEW_PASSWORD` (then `WARDEN_PASSWORD`)
/// is honored for non-interactive use.
pub fn prompt_new_password(prompt: &str, min_len: usize) -> anyhow::Result<SecretString> {
    for key in ["WARDEN_NEW_PASSWORD", "WARDEN_PASSWORD"] {
        if let Ok(value) = std::env::var(key) {
            if !value.trim().is_empty() {
                validate_master_password(&value, min_len)?;
                return Ok(SecretString::from(value));
            }
        }
    }
    if !std::io::stdin().is_terminal() {
        bail!("no master password provided and no TTY available. Set WARDEN_PASSWORD.");
    }
    loop {
        let value = Password::new()
            .with_prompt(prompt)
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("failed to read password: {}", e))?;
        if let Err(err) = validate_master_password(&value, min_len) {
            eprintln!("{err}");
            continue;
        }
        return Ok(SecretString::from(value));
    }
}

/// Ask the user to confirm a destructive action. Defaults to no.
pub fn confirm_destructive(warning: &str) -> anyhow::Result<bool> {
    if !std::io::stdin().is_terminal() {
        bail!("refusing to run a destructive command without a TTY; pass --yes to proceed.");
    }
    dialoguer::Confirm::new()
        .with_prompt(warning)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("failed to read confirmation: {}", e))
}
