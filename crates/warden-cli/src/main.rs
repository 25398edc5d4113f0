//! Warden CLI - a local, single-user secrets vault.
//!
//! This is the command-line interface for Warden. It provides a thin,
//! process-per-command consumer of the core library: every invocation
//! opens the vault, performs one operation, and exits; the derived key
//! never outlives the process.

mod app;
mod cli;
mod commands;
mod helpers;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{categories, config, credentials, init, misc, security};

fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(&cli)?;

    match cli.command {
        Commands::Init => init::handle_init(&ctx),
        Commands::Add(args) => credentials::handle_add(&ctx, args),
        Commands::List(args) => credentials::handle_list(&ctx, args),
        Commands::Show(args) => credentials::handle_show(&ctx, args),
        Commands::Edit(args) => credentials::handle_edit(&ctx, args),
        Commands::Rm(args) => credentials::handle_rm(&ctx, args),
        Commands::ClearAll(args) => credentials::handle_clear_all(&ctx, args),
        Commands::Export => credentials::handle_export(&ctx),
        Commands::ChangePassword => security::handle_change_password(&ctx),
        Commands::Reset(args) => security::handle_reset(&ctx, args),
        Commands::Categories(command) => categories::handle_categories(&ctx, command),
        Commands::Config(args) => config::handle_config(&ctx, args),
        Commands::Generate(args) => misc::handle_generate(args),
        Commands::Strength(args) => misc::handle_strength(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WARDEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
