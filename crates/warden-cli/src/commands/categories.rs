//! Category management commands.

use crate::app::AppContext;
use crate::cli::CategoriesCommand;

pub fn handle_categories(ctx: &AppContext, command: CategoriesCommand) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    match command {
        CategoriesCommand::List => {
            for category in store.list_categories()? {
                println!("{category}");
            }
        }
        CategoriesCommand::Add { name } => {
            store.add_category(&name)?;
            println!("Added category {name:?}");
        }
        CategoriesCommand::Rm { name } => {
            store.remove_category(&name)?;
            println!("Removed category {name:?}; its records are now Uncategorized");
        }
        CategoriesCommand::Rename { old, new } => {
            store.rename_category(&old, &new)?;
            println!("Renamed category {old:?} to {new:?}");
        }
    }
    Ok(())
}
