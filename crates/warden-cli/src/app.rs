//! Application context: vault location and store/session access.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use secrecy::ExposeSecret;
use warden_core::{CredentialStore, JsonFileBackend, VaultSession};

use crate::cli::Cli;
use crate::helpers::input::prompt_password;

pub struct AppContext {
    vault_path: PathBuf,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let vault_path = match &cli.vault {
            Some(path) => path.clone(),
            None => default_vault_path()?,
        };
        Ok(Self { vault_path })
    }

    pub fn vault_path(&self) -> &PathBuf {
        &self.vault_path
    }

    /// Open the credential store over the on-disk vault file.
    pub fn open_store(&self) -> anyhow::Result<Arc<CredentialStore>> {
        let backend = JsonFileBackend::new(&self.vault_path);
        let store = CredentialStore::open(Box::new(backend))
            .with_context(|| format!("failed to open vault at {}", self.vault_path.display()))?;
        Ok(Arc::new(store))
    }

    /// Open the store and log in with a prompted master password.
    pub fn login(&self) -> anyhow::Result<VaultSession> {
        let store = self.open_store()?;
        if !store.has_master_credential()? {
            bail!(
                "vault at {} is not initialized. Run `warden init` first.",
                self.vault_path.display()
            );
        }
        let password = prompt_password("Master password")?;
        let session = VaultSession::login(store, password.expose_secret())?;
        Ok(session)
    }
}

fn default_vault_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir().context("could not determine a data directory; pass --vault")?;
    Ok(data_dir.join("warden").join("vault.json"))
}
