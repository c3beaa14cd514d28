//! Transaction display formatting

use super::{format_date, format_money, format_percentage, separator, truncate};
use crate::models::{Transaction, TransactionKind};
use crate::services::ledger::LedgerSummary;

/// Format a single transaction as a register row
pub fn format_transaction_row(txn: &Transaction, symbol: &str, date_format: &str) -> String {
    let sign = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };

    format!(
        "{:<18} {:<10} {:<24} {:<16} {}{:>13}",
        txn.id.to_string(),
        format_date(txn.date, date_format),
        truncate(&txn.name, 24),
        truncate(&txn.category, 16),
        sign,
        format_money(txn.amount, symbol)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    symbol: &str,
    date_format: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<18} {:<10} {:<24} {:<16} {:>14}\n",
        "ID", "Date", "Name", "Category", "Amount"
    ));
    output.push_str(&separator(86));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, symbol, date_format));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Name:        {}\n", txn.name));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Amount:      {}\n", format_money(txn.amount, symbol)));
    output.push_str(&format!("Date:        {}\n", format_date(txn.date, date_format)));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!(
        "Recorded:    {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Format the dashboard summary
pub fn format_ledger_summary(summary: &LedgerSummary, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Ledger Summary\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!("Income:        {:>20}\n", format_money(summary.income, symbol)));
    output.push_str(&format!("Expenses:      {:>20}\n", format_money(summary.expense, symbol)));
    output.push_str(&format!("Balance:       {:>20}\n", format_money(summary.balance, symbol)));
    output.push_str(&format!("Transactions:  {:>20}\n", summary.count));
    output.push_str(&format!(
        "Savings rate:  {:>20}\n",
        format_percentage(summary.savings_rate)
    ));
    output.push_str(&format!("  {}\n", summary.savings_band.advice()));
    output.push('\n');
    output.push_str(&format!(
        "This month:    {} in, {} out\n",
        format_money(summary.this_month_income, symbol),
        format_money(summary.this_month_expense, symbol)
    ));

    output
}

/// Format the category list
pub fn format_category_list(categories: &[String]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Categories ({})\n", categories.len()));
    for name in categories {
        output.push_str(&format!("  {}\n", name));
    }
    output
}
