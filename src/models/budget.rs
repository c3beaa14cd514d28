//! Budget model
//!
//! A spending cap over a set of categories for a bounded date range. The spent,
//! remaining and status fields are derived; only the evaluator writes them.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::BudgetId;

/// Length of a budget's active window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// Exclusive end of a window starting at `start`
    ///
    /// Month arithmetic clamps to the last day of a shorter month
    /// (Jan 31 + 1 month = Feb 28/29).
    pub fn end_date(&self, start: NaiveDate) -> NaiveDate {
        let end = match self {
            Self::Weekly => start.checked_add_days(chrono::Days::new(7)),
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Yearly => start.checked_add_months(Months::new(12)),
        };
        end.unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weekly => write!(f, "Weekly"),
            Self::Monthly => write!(f, "Monthly"),
            Self::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            other => Err(format!("unknown budget period '{}'", other)),
        }
    }
}

/// Spend-vs-budget status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStatus {
    #[default]
    Good,
    Moderate,
    Warning,
    Exceeded,
}

impl BudgetStatus {
    /// Status for a usage percentage: 100+ exceeded, 80+ warning, 50+ moderate
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            Self::Exceeded
        } else if percentage >= 80.0 {
            Self::Warning
        } else if percentage >= 50.0 {
            Self::Moderate
        } else {
            Self::Good
        }
    }

    /// Whether this status should raise an alert when entered
    pub fn is_alerting(&self) -> bool {
        matches!(self, Self::Warning | Self::Exceeded)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Warning => write!(f, "Warning"),
            Self::Exceeded => write!(f, "Exceeded"),
        }
    }
}

/// A spending budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,

    /// Spending cap for the period
    pub amount: f64,

    pub period: BudgetPeriod,

    /// Tracked category names
    pub categories: Vec<String>,

    /// First day of the window (inclusive)
    pub start_date: NaiveDate,

    /// Last day of the window (exclusive)
    pub end_date: NaiveDate,

    #[serde(default)]
    pub actual_spent: f64,

    #[serde(default)]
    pub remaining: f64,

    #[serde(default)]
    pub status: BudgetStatus,

    pub created_at: DateTime<Utc>,
}

impl Budget {
    /// Create a budget whose window starts on `start_date`
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        period: BudgetPeriod,
        categories: Vec<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: BudgetId::new(),
            name: name.into().trim().to_string(),
            amount,
            period,
            categories: categories
                .into_iter()
                .map(|c| c.trim().to_string())
                .collect(),
            start_date,
            end_date: period.end_date(start_date),
            actual_spent: 0.0,
            remaining: amount,
            status: BudgetStatus::Good,
            created_at: Utc::now(),
        }
    }

    /// Whether a date falls in `[start_date, end_date)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }

    /// Whether a category name is tracked by this budget
    pub fn tracks(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Spent as a percentage of the cap
    pub fn usage_percentage(&self) -> f64 {
        if self.amount > 0.0 {
            self.actual_spent / self.amount * 100.0
        } else {
            0.0
        }
    }

    /// Whole days left in the window, never negative
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(BudgetValidationError::NonPositiveAmount(self.amount));
        }
        if self.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(BudgetValidationError::NoCategories);
        }
        Ok(())
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValidationError {
    EmptyName,
    NonPositiveAmount(f64),
    NoCategories,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Budget amount must be positive, got {}", amount)
            }
            Self::NoCategories => write!(f, "Budget must track at least one category"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_end_dates() {
        assert_eq!(BudgetPeriod::Weekly.end_date(date(2025, 3, 28)), date(2025, 4, 4));
        assert_eq!(BudgetPeriod::Monthly.end_date(date(2025, 1, 31)), date(2025, 2, 28));
        assert_eq!(BudgetPeriod::Yearly.end_date(date(2024, 2, 29)), date(2025, 2, 28));
    }

    #[test]
    fn test_window_is_half_open() {
        let budget = Budget::new(
            "Food",
            500.0,
            BudgetPeriod::Monthly,
            vec!["Food & Drink".into()],
            date(2025, 3, 1),
        );
        assert!(budget.contains(date(2025, 3, 1)));
        assert!(budget.contains(date(2025, 3, 31)));
        assert!(!budget.contains(date(2025, 4, 1)));
        assert!(!budget.contains(date(2025, 2, 28)));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(BudgetStatus::from_percentage(0.0), BudgetStatus::Good);
        assert_eq!(BudgetStatus::from_percentage(49.99), BudgetStatus::Good);
        assert_eq!(BudgetStatus::from_percentage(50.0), BudgetStatus::Moderate);
        assert_eq!(BudgetStatus::from_percentage(80.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::from_percentage(100.0), BudgetStatus::Exceeded);
        assert_eq!(BudgetStatus::from_percentage(250.0), BudgetStatus::Exceeded);
    }

    #[test]
    fn test_days_remaining_floors_at_zero() {
        let budget = Budget::new(
            "Fun",
            100.0,
            BudgetPeriod::Weekly,
            vec!["Entertainment".into()],
            date(2025, 3, 1),
        );
        assert_eq!(budget.days_remaining(date(2025, 3, 5)), 3);
        assert_eq!(budget.days_remaining(date(2025, 4, 1)), 0);
    }

    #[test]
    fn test_validation() {
        let mut budget = Budget::new("Fun", 100.0, BudgetPeriod::Weekly, vec![], date(2025, 3, 1));
        assert_eq!(budget.validate(), Err(BudgetValidationError::NoCategories));

        budget.categories = vec!["Entertainment".into()];
        budget.amount = 0.0;
        assert!(matches!(
            budget.validate(),
            Err(BudgetValidationError::NonPositiveAmount(_))
        ));
    }
}
