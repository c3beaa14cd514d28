//! Category CLI commands

use clap::Subcommand;

use super::with_ledger;
use crate::config::settings::Settings;
use crate::display::transaction::format_category_list;
use crate::error::PocketResult;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List all categories
    List,

    /// Add a category
    Add {
        /// Category name
        name: String,
    },

    /// Remove a category (transactions keep their category name)
    Remove {
        /// Category name
        name: String,
    },
}

/// Handle a category command
pub fn handle_category_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CategoryCommands,
) -> PocketResult<()> {
    with_ledger(storage, settings, |ledger| {
        match cmd {
            CategoryCommands::List => {
                print!("{}", format_category_list(&ledger.categories()?));
            }
            CategoryCommands::Add { name } => {
                let name = ledger.add_category(&name)?;
                println!("Added category: {}", name);
            }
            CategoryCommands::Remove { name } => {
                let name = ledger.remove_category(&name)?;
                println!("Removed category: {}", name);
            }
        }
        Ok(())
    })
}
