//! Transaction model
//!
//! An income or expense entry in the ledger. Amounts are always positive; the
//! direction lives in [`TransactionKind`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// A single ledger entry
///
/// Field names follow the export document (`type`, `createdAt`), so the same
/// serde shape is used on disk and in JSON exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Description
    pub name: String,

    /// Positive amount
    pub amount: f64,

    /// Transaction date
    pub date: NaiveDate,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// Category name (non-owning reference into the category list)
    pub category: String,

    /// When the transaction was recorded
    pub created_at: DateTime<Utc>,
}

/// User input for a new transaction
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.kind.is_none()
            && self.category.is_none()
    }
}

impl Transaction {
    /// Build a transaction from a draft, trimming the name
    pub fn from_draft(draft: TransactionDraft) -> Self {
        Self {
            id: TransactionId::new(),
            name: draft.name.trim().to_string(),
            amount: draft.amount,
            date: draft.date,
            kind: draft.kind,
            category: draft.category.trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Apply a patch in place, trimming text fields
    pub fn apply(&mut self, patch: TransactionPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Signed amount: positive for income, negative for expense
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Case-insensitive free-text match used by ledger search
    ///
    /// Matches name, category and kind; the amount matches on its plain
    /// decimal rendering.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.name.to_lowercase().contains(&term)
            || self.category.to_lowercase().contains(&term)
            || self.kind.as_str().contains(&term)
            || self.amount.to_string().contains(&term)
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.name.trim().is_empty() {
            return Err(TransactionValidationError::EmptyName);
        }

        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::MissingCategory);
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.2} ({})",
            self.date, self.name, self.signed_amount(), self.category
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionValidationError {
    EmptyName,
    NonPositiveAmount(f64),
    MissingCategory,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Transaction name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
            Self::MissingCategory => write!(f, "Transaction must have a category"),
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, amount: f64) -> TransactionDraft {
        TransactionDraft {
            name: name.into(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            kind: TransactionKind::Expense,
            category: "Food & Drink".into(),
        }
    }

    #[test]
    fn test_from_draft_trims_name() {
        let txn = Transaction::from_draft(draft("  Groceries  ", 45.5));
        assert_eq!(txn.name, "Groceries");
        assert!(txn.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_name() {
        let txn = Transaction::from_draft(draft("   ", 10.0));
        assert_eq!(txn.validate(), Err(TransactionValidationError::EmptyName));
    }

    #[test]
    fn test_validation_rejects_non_positive_amount() {
        for amount in [0.0, -5.0, f64::NAN] {
            let txn = Transaction::from_draft(draft("Coffee", amount));
            assert!(matches!(
                txn.validate(),
                Err(TransactionValidationError::NonPositiveAmount(_))
            ));
        }
    }

    #[test]
    fn test_signed_amount() {
        let mut txn = Transaction::from_draft(draft("Salary", 3000.0));
        assert_eq!(txn.signed_amount(), -3000.0);
        txn.kind = TransactionKind::Income;
        assert_eq!(txn.signed_amount(), 3000.0);
    }

    #[test]
    fn test_search_matching() {
        let txn = Transaction::from_draft(draft("Weekly Groceries", 120.25));
        assert!(txn.matches_search("groceries"));
        assert!(txn.matches_search("FOOD"));
        assert!(txn.matches_search("expense"));
        assert!(txn.matches_search("120.25"));
        assert!(!txn.matches_search("salary"));
    }

    #[test]
    fn test_serializes_with_export_field_names() {
        let txn = Transaction::from_draft(draft("Bus", 2.5));
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "expense");
        assert!(json.get("createdAt").is_some());
        assert!(json["id"].is_i64());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("out".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }
}
