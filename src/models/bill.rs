//! Upcoming bill model
//!
//! Bills feed the reminder generator only; paying one is recorded as an
//! ordinary expense transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BillId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub name: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        due_date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: BillId::new(),
            name: name.into().trim().to_string(),
            amount,
            due_date,
            category: category.into().trim().to_string(),
            created_at: Utc::now(),
        }
    }

    /// Calendar days from `today` until the due date (negative when overdue)
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    pub fn validate(&self) -> Result<(), BillValidationError> {
        if self.name.trim().is_empty() {
            return Err(BillValidationError::EmptyName);
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(BillValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillValidationError {
    EmptyName,
    NonPositiveAmount(f64),
}

impl fmt::Display for BillValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Bill name cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Bill amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for BillValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_until_due() {
        let bill = Bill::new(
            "Electricity",
            350.0,
            NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            "Home",
        );
        let today = NaiveDate::from_ymd_opt(2025, 5, 7).unwrap();
        assert_eq!(bill.days_until_due(today), 3);
        assert_eq!(
            bill.days_until_due(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap()),
            -2
        );
    }

    #[test]
    fn test_validation() {
        let bill = Bill::new("", 10.0, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), "");
        assert_eq!(bill.validate(), Err(BillValidationError::EmptyName));
    }
}
