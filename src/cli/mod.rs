//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the service layer.

pub mod bill;
pub mod budget;
pub mod calc;
pub mod category;
pub mod export;
pub mod goal;
pub mod notify;
pub mod report;
pub mod transaction;

pub use bill::{handle_bill_command, BillCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use calc::{handle_calc_command, CalcCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, handle_import, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use notify::{handle_notify_command, NotifyCommands};
pub use report::handle_report_command;
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDate};
use std::str::FromStr;

use crate::config::settings::Settings;
use crate::error::{PocketError, PocketResult};
use crate::models::ParseIdError;
use crate::services::{BudgetService, GoalService, Ledger, NotificationService};
use crate::storage::Storage;

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(value: &str) -> PocketResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        PocketError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", value))
    })
}

/// Parse an optional date argument, defaulting to today
pub fn parse_date_or_today(value: Option<&str>) -> PocketResult<NaiveDate> {
    value.map(parse_date).unwrap_or_else(|| Ok(today()))
}

/// Parse an entity id in display (`bud-123`) or raw form
pub fn parse_id<T>(value: &str) -> PocketResult<T>
where
    T: FromStr<Err = ParseIdError>,
{
    value
        .parse()
        .map_err(|e: ParseIdError| PocketError::Validation(e.to_string()))
}

/// Run `f` with a ledger whose changes flow on to notifications, budgets and
/// goals
///
/// Notifications subscribe before budgets so they can compare each budget's
/// fresh status with the one still on disk.
pub fn with_ledger<R>(
    storage: &Storage,
    settings: &Settings,
    f: impl FnOnce(&Ledger<'_>) -> PocketResult<R>,
) -> PocketResult<R> {
    let notifications = NotificationService::new(storage, &settings.notifications);
    let budgets = BudgetService::new(storage);
    let goals = GoalService::new(storage);

    let ledger = Ledger::new(storage)
        .subscribe(&notifications)
        .subscribe(&budgets)
        .subscribe(&goals);

    f(&ledger)
}
