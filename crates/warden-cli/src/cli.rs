//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use warden_core::store::LoginType;

#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "A local, single-user secrets vault")]
pub struct Cli {
    /// Path to the vault file (default: <data-dir>/warden/vault.json)
    #[arg(long, global = true, env = "WARDEN_VAULT")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new vault protected by a master password
    Init,
    /// Add a credential
    Add(AddArgs),
    /// List credentials (secrets are never shown here)
    List(ListArgs),
    /// Reveal a credential's secret
    Show(ShowArgs),
    /// Edit a credential
    Edit(EditArgs),
    /// Delete a credential
    Rm(RmArgs),
    /// Delete every credential (requires the vault's clear-all opt-in)
    ClearAll(ClearAllArgs),
    /// Export all credentials, decrypted, as JSON on stdout
    Export,
    /// Change the master password, re-encrypting every stored secret
    ChangePassword,
    /// Forgot-password reset: destroys ALL stored credentials
    Reset(ResetArgs),
    /// Manage categories
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Show or change vault settings
    Config(ConfigArgs),
    /// Generate a random password
    Generate(GenerateArgs),
    /// Score a candidate password from 0 to 100
    Strength(StrengthArgs),
}

/// CLI-facing login type; maps onto the core enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoginTypeArg {
    Password,
    SmsCode,
    Email,
}

impl From<LoginTypeArg> for LoginType {
    fn from(arg: LoginTypeArg) -> Self {
        match arg {
            LoginTypeArg::Password => LoginType::Password,
            LoginTypeArg::SmsCode => LoginType::SmsCode,
            LoginTypeArg::Email => LoginType::Email,
        }
    }
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Display name of the software or website
    pub name: String,

    #[arg(long)]
    pub username: Option<String>,

    /// How this credential is used to log in
    #[arg(long, value_enum, default_value = "password")]
    pub login_type: LoginTypeArg,

    /// Secret for password credentials; prompted if omitted
    #[arg(long)]
    pub secret: Option<String>,

    /// Phone number for sms-code credentials
    #[arg(long)]
    pub phone: Option<String>,

    /// Address for email credentials
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Category label; blank becomes "Uncategorized"
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Substring match over name, username, and url
    #[arg(long)]
    pub search: Option<String>,

    /// Exact category, or "All"
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Credential id (see `warden list`)
    pub id: u64,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Credential id (see `warden list`)
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long, value_enum)]
    pub login_type: Option<LoginTypeArg>,

    /// Replace the stored secret
    #[arg(long)]
    pub secret: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// New category; a blank value leaves the category unchanged
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Credential id (see `warden list`)
    pub id: u64,
}

#[derive(Debug, Args)]
pub struct ClearAllArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum CategoriesCommand {
    /// List categories
    List,
    /// Add a category
    Add { name: String },
    /// Remove a category; its records move to "Uncategorized"
    Rm { name: String },
    /// Rename a category and relabel its records
    Rename { old: String, new: String },
}

/// With no flags, prints the current settings as JSON.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Enable or disable the clear-all command
    #[arg(long)]
    pub allow_clear_all: Option<bool>,

    /// Enable or disable inactivity auto-lock
    #[arg(long)]
    pub auto_lock: Option<bool>,

    /// Auto-lock timeout in minutes
    #[arg(long)]
    pub auto_lock_minutes: Option<u32>,

    /// Enable or disable clipboard auto-clear
    #[arg(long)]
    pub clipboard_clear: Option<bool>,

    /// Clipboard auto-clear timeout in seconds
    #[arg(long)]
    pub clipboard_seconds: Option<u32>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(long, default_value_t = 16)]
    pub length: usize,

    #[arg(long)]
    pub no_lowercase: bool,

    #[arg(long)]
    pub no_uppercase: bool,

    #[arg(long)]
    pub no_digits: bool,

    #[arg(long)]
    pub no_symbols: bool,
}

#[derive(Debug, Args)]
pub struct StrengthArgs {
    /// Candidate password to score
    pub candidate: String,
}
