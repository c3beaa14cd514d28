//! Saved calculator results
//!
//! History entries wrap a finished result value; they are never edited, only
//! appended, trimmed to the configured limit, or cleared.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CalculationId;
use crate::calc::{LoanResult, MortgageResult, SavingsProjection};

/// The result a history entry holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "lowercase")]
pub enum CalculationResult {
    Loan(LoanResult),
    Mortgage(MortgageResult),
    Savings(SavingsProjection),
    Investment(SavingsProjection),
}

impl CalculationResult {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Loan(_) => "loan",
            Self::Mortgage(_) => "mortgage",
            Self::Savings(_) => "savings",
            Self::Investment(_) => "investment",
        }
    }

    /// One-line description for history listings
    pub fn headline(&self) -> String {
        match self {
            Self::Loan(r) => format!(
                "{:.2} over {} months at {}%: {:.2}/month",
                r.principal, r.term_months, r.annual_rate, r.monthly_payment
            ),
            Self::Mortgage(r) => format!(
                "{:.2} property, {:.2} down, {} years at {}%: {:.2}/month",
                r.property_price, r.down_payment, r.term_years, r.annual_rate, r.monthly_payment
            ),
            Self::Savings(r) => format!(
                "{:.2}/month for {} years at {}%: {:.2}",
                r.monthly_deposit, r.years, r.annual_return, r.final_amount
            ),
            Self::Investment(r) => format!(
                "{:.2} for {} years at {}%: {:.2}",
                r.initial_amount, r.years, r.annual_return, r.final_amount
            ),
        }
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.headline())
    }
}

/// A calculation history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: CalculationId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: CalculationResult,
}

impl CalculationRecord {
    pub fn new(result: CalculationResult) -> Self {
        Self {
            id: CalculationId::new(),
            created_at: Utc::now(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_loan, project, FeeRates};

    #[test]
    fn test_record_serialization_is_tagged() {
        let loan = compute_loan(10_000.0, 12, 6.0, &FeeRates::default(), false).unwrap();
        let record = CalculationRecord::new(CalculationResult::Loan(loan));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "loan");
        assert_eq!(json["result"]["term_months"], 12);

        let back: CalculationRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_headline() {
        let savings = project(0.0, 500.0, 10, 8.0, 3.0).unwrap();
        let result = CalculationResult::Savings(savings);
        assert_eq!(result.kind(), "savings");
        assert!(result.headline().starts_with("500.00/month for 10 years"));
    }
}
