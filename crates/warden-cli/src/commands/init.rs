use anyhow::bail;
use secrecy::ExposeSecret;
use warden_core::crypto::SETUP_MIN_PASSWORD_LEN;
use warden_core::VaultSession;

use crate::app::AppContext;
use crate::helpers::input::prompt_new_password;

pub fn handle_init(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    if store.has_master_credential()? {
        bail!(
            "vault at {} is already initialized",
            ctx.vault_path().display()
        );
    }

    let password = prompt_new_password("Choose a master password", SETUP_MIN_PASSWORD_LEN)?;
    let session = VaultSession::setup(store, password.expose_secret())?;
    session.lock();

    println!("Vault created at {}", ctx.vault_path().display());
    println!("There is no recovery path: a forgotten master password means `warden reset`,");
    println!("which destroys every stored credential.");
    Ok(())
}
