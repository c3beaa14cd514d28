//! Financial calculators
//!
//! Pure functions over explicit inputs. Nothing in here reads the ledger or
//! touches storage; results are plain values the caller may display or save
//! into the calculation history.
//!
//! - `amortization`: loan installment, payment schedule, effective-rate solver,
//!   fees and mortgage analysis
//! - `savings`: compound savings projection, milestones and investment strategies

pub mod amortization;
pub mod savings;

pub use amortization::{
    build_schedule, compute_fees_and_totals, compute_installment, compute_loan,
    compute_mortgage, solve_effective_rate, Affordability, AffordabilityRating, FeeBreakdown,
    FeeRates, LoanResult, LoanTotals, MortgageFees, MortgageOptions, MortgageResult, RentalYield,
    ScheduleEntry,
};
pub use savings::{
    milestones, project, project_investment, InvestmentStrategy, Milestone, SavingsProjection,
    TimelinePoint,
    DEFAULT_MILESTONES,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest loan term or savings horizon the calculators accept (100 years)
pub const MAX_TERM_MONTHS: u32 = 1_200;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10_f64.powi(digits);
    (value * factor).round() / factor
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Severity of a piece of calculator advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdviceLevel {
    Info,
    Warning,
    Danger,
}

impl fmt::Display for AdviceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A short observation attached to a calculator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub level: AdviceLevel,
    pub message: String,
    pub suggestion: String,
}

impl Advice {
    pub(crate) fn new(level: AdviceLevel, message: &str, suggestion: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
            suggestion: suggestion.to_string(),
        }
    }
}
