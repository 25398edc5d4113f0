//! Master-password operations: change and destructive reset.

use anyhow::bail;
use secrecy::ExposeSecret;
use warden_core::crypto::{RESET_MIN_PASSWORD_LEN, SETUP_MIN_PASSWORD_LEN};
use warden_core::VaultSession;

use crate::app::AppContext;
use crate::cli::ResetArgs;
use crate::helpers::input::{confirm_destructive, prompt_new_password, prompt_password};

pub fn handle_change_password(ctx: &AppContext) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    if !store.has_master_credential()? {
        bail!(
            "vault at {} is not initialized. Run `warden init` first.",
            ctx.vault_path().display()
        );
    }

    let old = prompt_password("Current master password")?;
    let session = VaultSession::login(store, old.expose_secret())?;
    let new = prompt_new_password("New master password", SETUP_MIN_PASSWORD_LEN)?;

    session.change_password(old.expose_secret(), new.expose_secret())?;
    println!("Master password changed; every stored secret was re-encrypted.");
    Ok(())
}

pub fn handle_reset(ctx: &AppContext, args: ResetArgs) -> anyhow::Result<()> {
    if !args.yes
        && !confirm_destructive(
            "Reset the vault? EVERY stored credential will be permanently destroyed.",
        )?
    {
        println!("Aborted.");
        return Ok(());
    }

    let store = ctx.open_store()?;
    let new = prompt_new_password("New master password", RESET_MIN_PASSWORD_LEN)?;
    let session = VaultSession::reset(store, new.expose_secret())?;
    session.lock();

    println!("Vault reset. All previous credentials are gone.");
    Ok(())
}
