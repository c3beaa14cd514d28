//! Savings goal model
//!
//! A target amount with a deadline. `current_amount` only moves through
//! explicit deposits and withdrawals; `progress` and `status` are derived.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GoalId;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Urgency/progress classification of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    New,
    Moderate,
    Near,
    Urgent,
    Achieved,
    Expired,
}

impl GoalStatus {
    /// Derive the status; the first matching rule wins
    pub fn derive(progress: f64, days_left: i64) -> Self {
        if progress >= 100.0 {
            Self::Achieved
        } else if days_left < 0 {
            Self::Expired
        } else if days_left < 7 {
            Self::Urgent
        } else if progress >= 80.0 {
            Self::Near
        } else if progress >= 50.0 {
            Self::Moderate
        } else {
            Self::New
        }
    }

    /// Display ordering: most pressing first
    pub fn sort_priority(&self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::Near => 1,
            Self::Moderate => 2,
            Self::New => 3,
            Self::Achieved => 4,
            Self::Expired => 5,
        }
    }

    /// Still being worked on (neither achieved nor expired)
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Achieved | Self::Expired)
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "New"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Near => write!(f, "Near"),
            Self::Urgent => write!(f, "Urgent"),
            Self::Achieved => write!(f, "Achieved"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,

    /// Free-form label, not tied to the ledger's category list
    #[serde(default)]
    pub category: String,

    pub created_date: DateTime<Utc>,

    /// Percentage of target reached, unclamped above 100
    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub status: GoalStatus,
}

impl Goal {
    /// Create a goal; progress and status are filled in by the evaluator
    pub fn new(
        title: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDate,
        category: impl Into<String>,
        initial_amount: f64,
    ) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into().trim().to_string(),
            target_amount,
            current_amount: initial_amount,
            deadline,
            category: category.into().trim().to_string(),
            created_date: Utc::now(),
            progress: 0.0,
            status: GoalStatus::New,
        }
    }

    /// Whole days until the deadline, rounded up
    ///
    /// The deadline is taken as midnight UTC at the start of that day, so a
    /// deadline of today yields 0 once the day has begun and -1 after a full
    /// day has passed.
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        let Some(deadline) = self.deadline.and_hms_opt(0, 0, 0) else {
            return 0;
        };
        let millis = (deadline.and_utc() - now).num_milliseconds();
        (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
    }

    /// Amount still needed, zero once achieved
    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Validate the goal
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(GoalValidationError::NonPositiveTarget(self.target_amount));
        }
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(GoalValidationError::NegativeBalance(self.current_amount));
        }
        Ok(())
    }
}

/// Validation errors for goals
#[derive(Debug, Clone, PartialEq)]
pub enum GoalValidationError {
    EmptyTitle,
    NonPositiveTarget(f64),
    NegativeBalance(f64),
}

impl fmt::Display for GoalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Goal title cannot be empty"),
            Self::NonPositiveTarget(amount) => {
                write!(f, "Goal target must be positive, got {}", amount)
            }
            Self::NegativeBalance(amount) => {
                write!(f, "Goal balance cannot go below zero, got {}", amount)
            }
        }
    }
}

impl std::error::Error for GoalValidationError {}
