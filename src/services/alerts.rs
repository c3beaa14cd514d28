//! Alert generators
//!
//! Pure functions that turn current state into notification candidates. They
//! never store anything; the notification service runs each candidate through
//! the policy.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::models::{
    Bill, Budget, Goal, GoalStatus, NotificationAction, NotificationCandidate, Priority,
};
use crate::services::ledger::LedgerSnapshot;

/// Transactions above this amount are flagged as large
pub const LARGE_TRANSACTION_THRESHOLD: f64 = 1_000.0;

/// How many large transactions one check reports
pub const LARGE_TRANSACTION_LIMIT: usize = 3;

/// Spending this many times the monthly average triggers an insight
pub const HIGH_SPENDING_FACTOR: f64 = 1.5;

/// Usage alert for one budget, if it has crossed 80%
pub fn budget_usage_alert(budget: &Budget) -> Option<NotificationCandidate> {
    let percentage = budget.usage_percentage();

    let candidate = if percentage >= 100.0 {
        NotificationCandidate::new(
            "danger",
            "Budget exceeded",
            format!("Budget \"{}\" has been fully spent", budget.name),
        )
        .priority(Priority::High)
        .action(NotificationAction::new("view_budget", budget.id.to_string()))
    } else if percentage >= 90.0 {
        NotificationCandidate::new(
            "warning",
            "Budget almost spent",
            format!("Budget \"{}\" is at {:.1}%", budget.name, percentage),
        )
        .priority(Priority::Normal)
    } else if percentage >= 80.0 {
        NotificationCandidate::new(
            "warning",
            "Budget alert",
            format!("Budget \"{}\" is nearing its limit", budget.name),
        )
        .priority(Priority::Low)
    } else {
        return None;
    };

    Some(candidate.category("budget"))
}

/// Usage and "ending soon" alerts for every budget
pub fn budget_alerts(budgets: &[Budget], today: NaiveDate) -> Vec<NotificationCandidate> {
    let mut candidates = Vec::new();

    for budget in budgets {
        candidates.extend(budget_usage_alert(budget));

        let days_remaining = budget.days_remaining(today);
        if days_remaining <= 3 {
            candidates.push(
                NotificationCandidate::new(
                    "info",
                    "Budget ending soon",
                    format!("Budget \"{}\" ends in {} days", budget.name, days_remaining),
                )
                .priority(Priority::Normal)
                .category("budget"),
            );
        }
    }

    candidates
}

/// Alerts for goals that need attention now
pub fn goal_alerts(goals: &[Goal]) -> Vec<NotificationCandidate> {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Urgent)
        .map(|goal| {
            NotificationCandidate::new(
                "danger",
                "Urgent goal",
                format!("Goal \"{}\" needs urgent attention", goal.title),
            )
            .priority(Priority::Urgent)
            .category("goal")
            .action(NotificationAction::new("view_goal", goal.id.to_string()))
        })
        .collect()
}

/// Reminders for bills due in exactly 0, 1, 3 or 7 days
pub fn bill_reminders(bills: &[Bill], today: NaiveDate) -> Vec<NotificationCandidate> {
    bills
        .iter()
        .filter_map(|bill| {
            let (kind, title, when, priority) = match bill.days_until_due(today) {
                0 => ("danger", "Bill due today", "today", Priority::Urgent),
                1 => ("danger", "Bill due tomorrow", "tomorrow", Priority::High),
                3 => ("warning", "Bill due soon", "in 3 days", Priority::Normal),
                7 => ("info", "Bill reminder", "in a week", Priority::Low),
                _ => return None,
            };
            Some(
                NotificationCandidate::new(
                    kind,
                    title,
                    format!("{} is due {}: {:.2}", bill.name, when, bill.amount),
                )
                .priority(priority)
                .category("bill"),
            )
        })
        .collect()
}

/// Average of monthly expense totals over months that have any expenses
pub fn average_monthly_expense(snapshot: &LedgerSnapshot) -> f64 {
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for txn in snapshot.expenses() {
        *by_month.entry((txn.date.year(), txn.date.month())).or_default() += txn.amount;
    }

    if by_month.is_empty() {
        return 0.0;
    }
    by_month.values().sum::<f64>() / by_month.len() as f64
}

/// Insight when this month's spending runs well above the monthly average
pub fn spending_insight(snapshot: &LedgerSnapshot, today: NaiveDate) -> Option<NotificationCandidate> {
    let first_of_month = today.with_day(1)?;
    let this_month: f64 = snapshot
        .expenses()
        .filter(|t| t.date >= first_of_month)
        .map(|t| t.amount)
        .sum();

    let average = average_monthly_expense(snapshot);
    if average <= 0.0 || this_month <= average * HIGH_SPENDING_FACTOR {
        return None;
    }

    Some(
        NotificationCandidate::new(
            "warning",
            "High spending",
            format!(
                "Spending this month is {:.1}% above your monthly average",
                (this_month / average - 1.0) * 100.0
            ),
        )
        .priority(Priority::Normal)
        .category("transaction"),
    )
}

/// Notices for the first few large transactions in ledger order
pub fn large_transactions(snapshot: &LedgerSnapshot) -> Vec<NotificationCandidate> {
    snapshot
        .transactions
        .iter()
        .filter(|t| t.amount > LARGE_TRANSACTION_THRESHOLD)
        .take(LARGE_TRANSACTION_LIMIT)
        .map(|txn| {
            NotificationCandidate::new(
                "info",
                "Large transaction",
                format!("Large transaction: {} - {:.2}", txn.name, txn.amount),
            )
            .priority(Priority::Low)
            .category("transaction")
        })
        .collect()
}
