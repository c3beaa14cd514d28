//! Transaction CLI commands
//!
//! Adds, edits, removes and lists ledger entries. Every mutation goes through
//! a ledger with its observers attached, so budgets, goals and notifications
//! are brought up to date before the command returns.

use clap::Subcommand;

use super::{parse_date, parse_date_or_today, parse_id, today, with_ledger};
use crate::config::settings::Settings;
use crate::display::transaction::{
    format_ledger_summary, format_transaction_details, format_transaction_register,
};
use crate::display::format_money;
use crate::error::{PocketError, PocketResult};
use crate::models::{TransactionDraft, TransactionId, TransactionKind, TransactionPatch};
use crate::services::TransactionFilter;
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Description
        name: String,
        /// Amount (always positive; the type gives the direction)
        amount: f64,
        /// Transaction type: income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Category name
        #[arg(short, long)]
        category: String,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show one transaction
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit an existing transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New description
        #[arg(short, long)]
        name: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<f64>,
        /// New type: income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Remove a transaction
    Remove {
        /// Transaction ID
        id: String,
        /// Skip the confirmation step
        #[arg(short, long)]
        force: bool,
    },

    /// List transactions, newest first
    List {
        /// Only income or only expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Earliest date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Text to look for in name or category
        #[arg(short, long)]
        search: Option<String>,
        /// Maximum number of rows
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },

    /// Show income and expense totals
    Totals,

    /// Show the dashboard summary
    Summary,
}

fn parse_kind(value: &str) -> PocketResult<TransactionKind> {
    value.parse().map_err(PocketError::Validation)
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> PocketResult<()> {
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    with_ledger(storage, settings, |ledger| {
        match cmd {
            TransactionCommands::Add {
                name,
                amount,
                kind,
                category,
                date,
            } => {
                let draft = TransactionDraft {
                    name,
                    amount,
                    date: parse_date_or_today(date.as_deref())?,
                    kind: parse_kind(&kind)?,
                    category,
                };
                let txn = ledger.add(draft)?;

                println!("Recorded transaction:");
                print!("{}", format_transaction_details(&txn, symbol, date_format));
            }

            TransactionCommands::Show { id } => {
                let id: TransactionId = parse_id(&id)?;
                let txn = ledger
                    .get(id)?
                    .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))?;
                print!("{}", format_transaction_details(&txn, symbol, date_format));
            }

            TransactionCommands::Edit {
                id,
                name,
                amount,
                kind,
                category,
                date,
            } => {
                let id: TransactionId = parse_id(&id)?;
                let patch = TransactionPatch {
                    name,
                    amount,
                    date: date.as_deref().map(parse_date).transpose()?,
                    kind: kind.as_deref().map(parse_kind).transpose()?,
                    category,
                };
                if patch.is_empty() {
                    println!("Nothing to change. Pass at least one of --name, --amount, --type, --category, --date.");
                    return Ok(());
                }

                let txn = ledger.update(id, patch)?;
                println!("Updated transaction:");
                print!("{}", format_transaction_details(&txn, symbol, date_format));
            }

            TransactionCommands::Remove { id, force } => {
                let id: TransactionId = parse_id(&id)?;
                if !force {
                    let txn = ledger
                        .get(id)?
                        .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))?;
                    println!("About to remove transaction:");
                    print!("{}", format_transaction_details(&txn, symbol, date_format));
                    println!();
                    println!("Use --force to confirm removal");
                    return Ok(());
                }

                let txn = ledger.remove(id)?;
                println!("Removed transaction {} ({})", txn.id, txn.name);
            }

            TransactionCommands::List {
                kind,
                category,
                from,
                to,
                search,
                limit,
            } => {
                let filter = TransactionFilter {
                    kind: kind.as_deref().map(parse_kind).transpose()?,
                    category,
                    start_date: from.as_deref().map(parse_date).transpose()?,
                    end_date: to.as_deref().map(parse_date).transpose()?,
                    search,
                    limit: Some(limit),
                };
                let transactions = ledger.query(&filter)?;

                print!("{}", format_transaction_register(&transactions, symbol, date_format));
                if !transactions.is_empty() {
                    println!("\nShowing {} transactions", transactions.len());
                }
            }

            TransactionCommands::Totals => {
                let income = ledger.totals(TransactionKind::Income)?;
                let expense = ledger.totals(TransactionKind::Expense)?;
                println!("Income:   {:>16}", format_money(income, symbol));
                println!("Expenses: {:>16}", format_money(expense, symbol));
                println!("Balance:  {:>16}", format_money(income - expense, symbol));
            }

            TransactionCommands::Summary => {
                let summary = ledger.summary(today())?;
                print!("{}", format_ledger_summary(&summary, symbol));
            }
        }
        Ok(())
    })
}
