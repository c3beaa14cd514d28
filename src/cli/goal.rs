//! Goal CLI commands

use chrono::Utc;
use clap::Subcommand;

use super::{parse_date, parse_id};
use crate::config::settings::Settings;
use crate::display::budget::{format_goal_list, format_goal_summary};
use crate::display::format_money;
use crate::error::PocketResult;
use crate::models::GoalId;
use crate::services::{CreateGoalInput, GoalService};
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal title
        title: String,
        /// Amount to reach
        target: f64,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: String,
        /// Category the goal belongs to
        #[arg(short, long, default_value = "Savings")]
        category: String,
        /// Amount already saved
        #[arg(short, long, default_value = "0")]
        initial: f64,
    },

    /// Add to (or with a negative amount, withdraw from) a goal
    Deposit {
        /// Goal ID
        id: String,
        /// Amount to add; negative to withdraw
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// List goals, most pressing first
    List,

    /// Show totals across all goals
    Summary,

    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GoalCommands,
) -> PocketResult<()> {
    let service = GoalService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let now = Utc::now();

    match cmd {
        GoalCommands::Create {
            title,
            target,
            deadline,
            category,
            initial,
        } => {
            let input = CreateGoalInput {
                title,
                target_amount: target,
                deadline: parse_date(&deadline)?,
                category,
                initial_amount: initial,
            };
            let goal = service.create(input, now)?;
            println!("Created goal {} ({})", goal.id, goal.title);
            print!("{}", format_goal_list(&[goal], symbol));
        }

        GoalCommands::Deposit { id, amount } => {
            let id: GoalId = parse_id(&id)?;
            let goal = service.update_progress(id, amount, now)?;
            let verb = if amount < 0.0 { "Withdrew" } else { "Added" };
            println!(
                "{} {} ({} of {} saved)",
                verb,
                format_money(amount.abs(), symbol),
                format_money(goal.current_amount, symbol),
                format_money(goal.target_amount, symbol)
            );
            print!("{}", format_goal_list(&[goal], symbol));
        }

        GoalCommands::List => {
            print!("{}", format_goal_list(&service.list(now)?, symbol));
        }

        GoalCommands::Summary => {
            print!("{}", format_goal_summary(&service.summary(now)?, symbol));
        }

        GoalCommands::Delete { id } => {
            let id: GoalId = parse_id(&id)?;
            let goal = service.delete(id)?;
            println!("Deleted goal {} ({})", goal.id, goal.title);
        }
    }

    Ok(())
}
