//! Budget CLI commands

use clap::Subcommand;

use super::{parse_date_or_today, parse_id, today};
use crate::config::settings::Settings;
use crate::display::budget::{format_budget_details, format_budget_list};
use crate::error::{PocketError, PocketResult};
use crate::models::{BudgetId, BudgetPeriod};
use crate::services::{BudgetService, CreateBudgetInput};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget
    Create {
        /// Budget name
        name: String,
        /// Spending limit for one period
        amount: f64,
        /// Period: weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// Tracked categories, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        categories: Vec<String>,
        /// First day of the window (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<String>,
    },

    /// List budgets with their usage
    List,

    /// Show one budget in detail
    Show {
        /// Budget ID
        id: String,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> PocketResult<()> {
    let service = BudgetService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Create {
            name,
            amount,
            period,
            categories,
            start,
        } => {
            let period: BudgetPeriod = period.parse().map_err(PocketError::Validation)?;
            let input = CreateBudgetInput {
                name,
                amount,
                period,
                categories,
                start_date: parse_date_or_today(start.as_deref())?,
            };
            let budget = service.create(input)?;

            println!("Created budget:");
            print!("{}", format_budget_details(&budget, today(), symbol));
        }

        BudgetCommands::List => {
            let budgets = service.list()?;
            let totals = service.totals()?;
            print!("{}", format_budget_list(&budgets, &totals, symbol));
        }

        BudgetCommands::Show { id } => {
            let id: BudgetId = parse_id(&id)?;
            let budget = service.show(id)?;
            print!("{}", format_budget_details(&budget, today(), symbol));
        }

        BudgetCommands::Delete { id } => {
            let id: BudgetId = parse_id(&id)?;
            let budget = service.delete(id)?;
            println!("Deleted budget {} ({})", budget.id, budget.name);
        }
    }

    Ok(())
}
