//! Bill CLI commands

use clap::Subcommand;

use super::{parse_date, parse_id, today};
use crate::config::settings::Settings;
use crate::display::budget::format_bill_list;
use crate::error::PocketResult;
use crate::models::BillId;
use crate::services::BillService;
use crate::storage::Storage;

/// Bill subcommands
#[derive(Subcommand)]
pub enum BillCommands {
    /// Record an upcoming bill
    Add {
        /// Bill name
        name: String,
        /// Amount due
        amount: f64,
        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: String,
        /// Category
        #[arg(short, long, default_value = "Home")]
        category: String,
    },

    /// List bills, soonest first
    List {
        /// Include bills whose due date has passed
        #[arg(short, long)]
        all: bool,
    },

    /// Remove a bill
    Remove {
        /// Bill ID
        id: String,
    },
}

/// Handle a bill command
pub fn handle_bill_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BillCommands,
) -> PocketResult<()> {
    let service = BillService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let today = today();

    match cmd {
        BillCommands::Add {
            name,
            amount,
            due,
            category,
        } => {
            let bill = service.add(&name, amount, parse_date(&due)?, &category)?;
            println!("Added bill:");
            print!("{}", format_bill_list(&[bill], today, symbol));
        }
        BillCommands::List { all } => {
            let bills = if all {
                service.list()?
            } else {
                service.upcoming(today)?
            };
            print!("{}", format_bill_list(&bills, today, symbol));
        }
        BillCommands::Remove { id } => {
            let id: BillId = parse_id(&id)?;
            let bill = service.remove(id)?;
            println!("Removed bill {} ({})", bill.id, bill.name);
        }
    }

    Ok(())
}
