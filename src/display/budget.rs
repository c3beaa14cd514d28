//! Budget, goal and bill display formatting

use chrono::NaiveDate;

use super::{format_bar, format_money, format_percentage, separator, truncate};
use crate::models::{Bill, Budget, BudgetStatus, Goal, GoalStatus};
use crate::services::{BudgetTotals, GoalSummary};

const BAR_WIDTH: usize = 20;

fn budget_marker(status: BudgetStatus) -> &'static str {
    match status {
        BudgetStatus::Good => " ",
        BudgetStatus::Moderate => "~",
        BudgetStatus::Warning => "!",
        BudgetStatus::Exceeded => "✗",
    }
}

/// Format budgets with a usage bar each
pub fn format_budget_list(budgets: &[Budget], totals: &BudgetTotals, symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets yet. Create one with 'pocket budget create'.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<18} {:<20} {:<8} {:>13} {:>13} {:>6}\n",
        "ID", "Name", "Period", "Spent", "Budget", "Used"
    ));
    output.push_str(&separator(88));
    output.push('\n');

    for budget in budgets {
        output.push_str(&format!(
            "{} {:<18} {:<20} {:<8} {:>13} {:>13} {:>6}\n",
            budget_marker(budget.status),
            budget.id.to_string(),
            truncate(&budget.name, 20),
            budget.period.to_string(),
            format_money(budget.actual_spent, symbol),
            format_money(budget.amount, symbol),
            format_percentage(budget.usage_percentage())
        ));
        output.push_str(&format!(
            "  {} {}\n",
            format_bar(budget.actual_spent, budget.amount, BAR_WIDTH),
            budget.status
        ));
    }

    output.push_str(&separator(88));
    output.push('\n');
    output.push_str(&format!(
        "{} budgets, {} of {} spent ({} exceeded, {} near the limit)\n",
        totals.count,
        format_money(totals.total_spent, symbol),
        format_money(totals.total_amount, symbol),
        totals.exceeded,
        totals.warning
    ));

    output
}

/// Format one budget in detail
pub fn format_budget_details(budget: &Budget, today: NaiveDate, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Budget:     {} ({})\n", budget.name, budget.id));
    output.push_str(&format!("Period:     {}\n", budget.period));
    output.push_str(&format!(
        "Window:     {} to {} (exclusive)\n",
        budget.start_date, budget.end_date
    ));
    output.push_str(&format!("Categories: {}\n", budget.categories.join(", ")));
    output.push_str(&format!("Budget:     {}\n", format_money(budget.amount, symbol)));
    output.push_str(&format!("Spent:      {}\n", format_money(budget.actual_spent, symbol)));
    output.push_str(&format!("Remaining:  {}\n", format_money(budget.remaining, symbol)));
    output.push_str(&format!(
        "Usage:      {} {}\n",
        format_bar(budget.actual_spent, budget.amount, BAR_WIDTH),
        format_percentage(budget.usage_percentage())
    ));
    output.push_str(&format!("Status:     {}\n", budget.status));
    output.push_str(&format!("Days left:  {}\n", budget.days_remaining(today)));

    output
}

fn goal_marker(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Urgent => "!",
        GoalStatus::Achieved => "✓",
        GoalStatus::Expired => "✗",
        _ => " ",
    }
}

/// Format goals, most pressing first as given
pub fn format_goal_list(goals: &[Goal], symbol: &str) -> String {
    if goals.is_empty() {
        return "No goals yet. Create one with 'pocket goal create'.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<20} {:<20} {:>13} {:>13} {:<10} {:<9}\n",
        "ID", "Title", "Saved", "Target", "Deadline", "Status"
    ));
    output.push_str(&separator(92));
    output.push('\n');

    for goal in goals {
        output.push_str(&format!(
            "{} {:<20} {:<20} {:>13} {:>13} {:<10} {:<9}\n",
            goal_marker(goal.status),
            goal.id.to_string(),
            truncate(&goal.title, 20),
            format_money(goal.current_amount, symbol),
            format_money(goal.target_amount, symbol),
            goal.deadline,
            goal.status
        ));
        output.push_str(&format!(
            "  {} {}\n",
            format_bar(goal.progress, 100.0, BAR_WIDTH),
            format_percentage(goal.progress)
        ));
    }

    output
}

/// Format the goal overview
pub fn format_goal_summary(summary: &GoalSummary, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str("Goals\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!("Total:            {}\n", summary.total));
    output.push_str(&format!("Achieved:         {}\n", summary.achieved));
    output.push_str(&format!("In progress:      {}\n", summary.in_progress));
    output.push_str(&format!(
        "Saved:            {} of {}\n",
        format_money(summary.total_saved, symbol),
        format_money(summary.total_target, symbol)
    ));
    output.push_str(&format!(
        "Average progress: {}\n",
        format_percentage(summary.average_progress)
    ));
    output
}

/// Format upcoming bills
pub fn format_bill_list(bills: &[Bill], today: NaiveDate, symbol: &str) -> String {
    if bills.is_empty() {
        return "No bills recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<20} {:<20} {:>13} {:<10} {:<14}\n",
        "ID", "Name", "Amount", "Due", "When"
    ));
    output.push_str(&separator(80));
    output.push('\n');

    for bill in bills {
        let days = bill.days_until_due(today);
        let when = match days {
            d if d < 0 => format!("{} days ago", -d),
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            d => format!("in {} days", d),
        };
        output.push_str(&format!(
            "{:<20} {:<20} {:>13} {:<10} {:<14}\n",
            bill.id.to_string(),
            truncate(&bill.name, 20),
            format_money(bill.amount, symbol),
            bill.due_date,
            when
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetPeriod;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_budget_list() {
        let mut budget = Budget::new(
            "Groceries",
            400.0,
            BudgetPeriod::Monthly,
            vec!["Food & Drink".into()],
            date(2025, 3, 1),
        );
        budget.actual_spent = 440.0;
        budget.remaining = -40.0;
        budget.status = BudgetStatus::Exceeded;

        let totals = BudgetTotals {
            count: 1,
            total_amount: 400.0,
            total_spent: 440.0,
            exceeded: 1,
            warning: 0,
        };
        let out = format_budget_list(&[budget.clone()], &totals, "$");
        assert!(out.starts_with("  ID"));
        assert!(out.contains("✗ bud-"));
        assert!(out.contains("110%"));
        assert!(out.contains("Exceeded"));

        let details = format_budget_details(&budget, date(2025, 3, 20), "$");
        assert!(details.contains("Remaining:  -$40.00"));
        assert!(details.contains("Days left:  12"));
    }

    #[test]
    fn test_empty_lists() {
        let totals = BudgetTotals {
            count: 0,
            total_amount: 0.0,
            total_spent: 0.0,
            exceeded: 0,
            warning: 0,
        };
        assert!(format_budget_list(&[], &totals, "$").contains("No budgets"));
        assert!(format_goal_list(&[], "$").contains("No goals"));
        assert!(format_bill_list(&[], date(2025, 1, 1), "$").contains("No bills"));
    }

    #[test]
    fn test_bill_when_column() {
        let today = date(2025, 6, 10);
        let bills = vec![
            Bill::new("Rent", 900.0, date(2025, 6, 10), "Home"),
            Bill::new("Phone", 30.0, date(2025, 6, 11), "Home"),
            Bill::new("Gym", 25.0, date(2025, 6, 8), "Health"),
        ];
        let out = format_bill_list(&bills, today, "$");
        assert!(out.contains("today"));
        assert!(out.contains("tomorrow"));
        assert!(out.contains("2 days ago"));
    }
}
