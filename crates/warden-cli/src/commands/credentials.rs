//! Credential CRUD commands.

use std::io::IsTerminal;

use anyhow::bail;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use warden_core::store::{CredentialFilter, LoginType};
use warden_core::{CredentialChanges, CredentialInput};

use crate::app::AppContext;
use crate::cli::{AddArgs, ClearAllArgs, EditArgs, ListArgs, RmArgs, ShowArgs};
use crate::helpers::input::confirm_destructive;

pub fn handle_add(ctx: &AppContext, args: AddArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;

    let login_type: LoginType = args.login_type.into();
    let secret = match (login_type, args.secret) {
        (LoginType::Password, Some(secret)) => Some(secret),
        (LoginType::Password, None) => Some(prompt_secret()?),
        (_, secret) => secret,
    };

    let id = session.add_credential(CredentialInput {
        software_name: args.name,
        username: args.username,
        login_type,
        secret,
        phone_number: args.phone,
        email_address: args.email,
        url: args.url,
        notes: args.notes,
        category: args.category,
    })?;

    println!("Added credential {id}");
    Ok(())
}

pub fn handle_list(ctx: &AppContext, args: ListArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;
    let credentials = session.list_credentials(&CredentialFilter {
        search: args.search,
        category: args.category,
    })?;

    if credentials.is_empty() {
        println!("No credentials found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Name", "Username", "Type", "Category", "Updated"]);
    for credential in &credentials {
        table.add_row(vec![
            credential.id.to_string(),
            credential.software_name.clone(),
            credential.username.clone().unwrap_or_default(),
            login_type_label(credential.login_type).to_string(),
            credential.category.clone(),
            credential.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn handle_show(ctx: &AppContext, args: ShowArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;
    let secret = session.reveal_secret(args.id)?;
    println!("{secret}");
    Ok(())
}

pub fn handle_edit(ctx: &AppContext, args: EditArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;
    session.update_credential(
        args.id,
        CredentialChanges {
            software_name: args.name,
            username: args.username,
            login_type: args.login_type.map(Into::into),
            secret: args.secret,
            phone_number: args.phone,
            email_address: args.email,
            url: args.url,
            notes: args.notes,
            category: args.category,
        },
    )?;
    println!("Updated credential {}", args.id);
    Ok(())
}

pub fn handle_rm(ctx: &AppContext, args: RmArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;
    session.delete_credential(args.id)?;
    println!("Deleted credential {}", args.id);
    Ok(())
}

pub fn handle_clear_all(ctx: &AppContext, args: ClearAllArgs) -> anyhow::Result<()> {
    let session = ctx.login()?;
    if !args.yes
        && !confirm_destructive("Delete EVERY stored credential? This cannot be undone.")?
    {
        println!("Aborted.");
        return Ok(());
    }
    session.clear_all()?;
    println!("All credentials deleted.");
    Ok(())
}

pub fn handle_export(ctx: &AppContext) -> anyhow::Result<()> {
    let session = ctx.login()?;
    let exported = session.export_all()?;
    println!("{}", serde_json::to_string_pretty(&exported)?);
    Ok(())
}

fn login_type_label(login_type: LoginType) -> &'static str {
    match login_type {
        LoginType::Password => "password",
        LoginType::SmsCode => "sms-code",
        LoginType::Email => "email",
    }
}

fn prompt_secret() -> anyhow::Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!("no TTY available to prompt for the secret; pass --secret.");
    }
    dialoguer::Password::new()
        .with_prompt("Secret")
        .interact()
        .map_err(|e| anyhow::anyhow!("failed to read secret: {}", e))
}
