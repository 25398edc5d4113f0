//! Vault settings command.

use crate::app::AppContext;
use crate::cli::ConfigArgs;

pub fn handle_config(ctx: &AppContext, args: ConfigArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let mut config = store.config()?;

    let mut changed = false;
    if let Some(value) = args.allow_clear_all {
        config.dangerous.allow_clear_all = value;
        changed = true;
    }
    if let Some(value) = args.auto_lock {
        config.auto_lock.enabled = value;
        changed = true;
    }
    if let Some(value) = args.auto_lock_minutes {
        config.auto_lock.timeout_minutes = value;
        changed = true;
    }
    if let Some(value) = args.clipboard_clear {
        config.clipboard.auto_clear = value;
        changed = true;
    }
    if let Some(value) = args.clipboard_seconds {
        config.clipboard.timeout_seconds = value;
        changed = true;
    }

    if changed {
        store.update_config(config.clone())?;
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
