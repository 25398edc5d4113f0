//! Password utilities that need no vault access.

use warden_core::crypto::{generate_password, password_strength, PasswordSpec};

use crate::cli::{GenerateArgs, StrengthArgs};

pub fn handle_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let spec = PasswordSpec {
        length: args.length,
        lowercase: !args.no_lowercase,
        uppercase: !args.no_uppercase,
        digits: !args.no_digits,
        symbols: !args.no_symbols,
    };
    println!("{}", generate_password(&spec));
    Ok(())
}

pub fn handle_strength(args: StrengthArgs) -> anyhow::Result<()> {
    println!("{}", password_strength(&args.candidate));
    Ok(())
}
