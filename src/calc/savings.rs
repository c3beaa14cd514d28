//! Compound savings projection
//!
//! Month-by-month simulation: each month the running balance first earns the
//! monthly return, then the deposit is added. A deposit therefore earns nothing
//! in the month it is made. The loop is the contract; there is no closed-form
//! shortcut.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{round2, round_to, Advice, AdviceLevel, MAX_TERM_MONTHS};
use crate::error::{PocketError, PocketResult};

/// Round-number balances reported as milestones
pub const DEFAULT_MILESTONES: [f64; 6] = [
    10_000.0,
    50_000.0,
    100_000.0,
    250_000.0,
    500_000.0,
    1_000_000.0,
];

/// One sampled point of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub year: u32,
    pub month: u32,
    pub value: f64,
    pub total_deposits: f64,
    pub total_earnings: f64,
}

/// Estimated time to reach a round-number balance
///
/// `years_to_reach` is a linear interpolation over the whole horizon, not an
/// inversion of the compounding curve, so it overstates early milestones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub amount: f64,
    pub years_to_reach: f64,
    /// Share of the final balance this milestone represents
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub initial_amount: f64,
    pub monthly_deposit: f64,
    pub years: u32,
    pub annual_return: f64,
    pub inflation: f64,

    pub final_amount: f64,
    pub total_deposits: f64,
    pub total_earnings: f64,
    pub earnings_percentage: f64,
    /// `None` when nothing was deposited
    pub annualized_return: Option<f64>,

    /// Final amount in today's money
    pub real_value: f64,
    pub purchasing_power_loss: f64,

    pub timeline: Vec<TimelinePoint>,
    pub milestones: Vec<Milestone>,
    pub advice: Vec<Advice>,
}

/// Preset return assumptions for lump-sum investments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStrategy {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl InvestmentStrategy {
    pub fn all() -> &'static [InvestmentStrategy] {
        &[Self::Conservative, Self::Moderate, Self::Aggressive]
    }

    /// Lookup by name; anything unrecognized is treated as moderate
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "conservative" => Self::Conservative,
            "aggressive" => Self::Aggressive,
            _ => Self::Moderate,
        }
    }

    /// Assumed annual return in percent
    pub fn annual_return(&self) -> f64 {
        match self {
            Self::Conservative => 4.0,
            Self::Moderate => 8.0,
            Self::Aggressive => 12.0,
        }
    }
}

impl fmt::Display for InvestmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conservative => write!(f, "conservative"),
            Self::Moderate => write!(f, "moderate"),
            Self::Aggressive => write!(f, "aggressive"),
        }
    }
}

fn non_negative(name: &str, value: f64) -> PocketResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "{} cannot be negative, got {}",
            name, value
        )));
    }
    Ok(())
}

fn above_total_loss(name: &str, value: f64) -> PocketResult<()> {
    if !value.is_finite() || value <= -100.0 {
        return Err(PocketError::InvalidInput(format!(
            "{} must be greater than -100%, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Milestones in `thresholds` that the final balance reaches
pub fn milestones(final_amount: f64, years: u32, thresholds: &[f64]) -> Vec<Milestone> {
    if final_amount <= 0.0 {
        return Vec::new();
    }

    thresholds
        .iter()
        .copied()
        .filter(|&threshold| threshold <= final_amount)
        .map(|threshold| {
            let share = threshold / final_amount;
            Milestone {
                amount: threshold,
                years_to_reach: round_to(share * f64::from(years), 1),
                percentage: round2(share * 100.0),
            }
        })
        .collect()
}

fn savings_advice(monthly_deposit: f64, annual_return_percent: f64, years: u32) -> Vec<Advice> {
    let mut advice = Vec::new();

    if monthly_deposit < 500.0 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Monthly deposit is low",
            "Try to raise the deposit to at least 500 a month",
        ));
    }

    if annual_return_percent < 5.0 {
        advice.push(Advice::new(
            AdviceLevel::Info,
            "Expected return is low",
            "Consider diversifying into higher-return investments",
        ));
    }

    if years < 5 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Short savings horizon",
            "Compounding needs time; saving longer multiplies the result",
        ));
    }

    advice
}

/// Project a savings plan
///
/// The timeline samples the first month of every year plus the final month.
/// Inflation discounts the final amount by `(1 + inflation/100)^years`.
pub fn project(
    initial_amount: f64,
    monthly_deposit: f64,
    years: u32,
    annual_return_percent: f64,
    inflation_percent: f64,
) -> PocketResult<SavingsProjection> {
    non_negative("Initial amount", initial_amount)?;
    non_negative("Monthly deposit", monthly_deposit)?;
    if years == 0 {
        return Err(PocketError::InvalidInput(
            "Savings horizon must be at least one year".into(),
        ));
    }
    above_total_loss("Annual return", annual_return_percent)?;
    above_total_loss("Inflation", inflation_percent)?;

    let months = years
        .checked_mul(12)
        .filter(|months| *months <= MAX_TERM_MONTHS)
        .ok_or_else(|| {
            PocketError::InvalidInput(format!(
                "Horizon cannot exceed {} years, got {}",
                MAX_TERM_MONTHS / 12,
                years
            ))
        })?;
    let monthly_return = annual_return_percent / 100.0 / 12.0;

    let mut balance = initial_amount;
    let mut timeline = Vec::with_capacity(years as usize + 1);

    for i in 0..months {
        balance *= 1.0 + monthly_return;
        balance += monthly_deposit;

        if i % 12 == 0 || i == months - 1 {
            let deposits = initial_amount + monthly_deposit * f64::from(i + 1);
            timeline.push(TimelinePoint {
                year: i / 12 + 1,
                month: i + 1,
                value: round2(balance),
                total_deposits: round2(deposits),
                total_earnings: round2(balance - deposits),
            });
        }
    }

    let total_deposits = initial_amount + monthly_deposit * f64::from(months);
    let total_earnings = balance - total_deposits;
    let earnings_percentage = if total_deposits > 0.0 {
        total_earnings / total_deposits * 100.0
    } else {
        0.0
    };
    let annualized_return = (total_deposits > 0.0)
        .then(|| ((balance / total_deposits).powf(1.0 / f64::from(years)) - 1.0) * 100.0)
        .map(round2);

    let real_value = balance / (1.0 + inflation_percent / 100.0).powf(f64::from(years));
    let purchasing_power_loss = if balance > 0.0 {
        (balance - real_value) / balance * 100.0
    } else {
        0.0
    };

    debug!(
        initial_amount,
        monthly_deposit, years, annual_return_percent, balance, "projected savings"
    );

    Ok(SavingsProjection {
        initial_amount,
        monthly_deposit,
        years,
        annual_return: annual_return_percent,
        inflation: inflation_percent,
        final_amount: round2(balance),
        total_deposits: round2(total_deposits),
        total_earnings: round2(total_earnings),
        earnings_percentage: round2(earnings_percentage),
        annualized_return,
        real_value: round2(real_value),
        purchasing_power_loss: round2(purchasing_power_loss),
        timeline,
        milestones: milestones(balance, years, &DEFAULT_MILESTONES),
        advice: savings_advice(monthly_deposit, annual_return_percent, years),
    })
}

/// Project a lump sum under a preset strategy
pub fn project_investment(
    amount: f64,
    strategy: InvestmentStrategy,
    years: u32,
    inflation_percent: f64,
) -> PocketResult<SavingsProjection> {
    project(
        amount,
        0.0,
        years,
        strategy.annual_return(),
        inflation_percent,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_loop(initial: f64, deposit: f64, years: u32, rate: f64) -> f64 {
        let r = rate / 100.0 / 12.0;
        let mut value = initial;
        for _ in 0..years * 12 {
            value = value * (1.0 + r) + deposit;
        }
        value
    }

    #[test]
    fn test_matches_reference_loop() {
        let projection = project(0.0, 500.0, 10, 8.0, 3.0).unwrap();
        let expected = reference_loop(0.0, 500.0, 10, 8.0);

        assert!((expected - 91_473.0176).abs() < 0.001);
        assert!((projection.final_amount - expected).abs() < 0.01);
        assert_eq!(projection.total_deposits, 60_000.0);
        assert!((projection.total_earnings - (expected - 60_000.0)).abs() < 0.01);
    }

    #[test]
    fn test_deposit_earns_nothing_in_its_own_month() {
        let projection = project(0.0, 100.0, 1, 12.0, 0.0).unwrap();
        assert_eq!(projection.timeline[0].value, 100.0);
        assert_eq!(projection.timeline[0].month, 1);
    }

    #[test]
    fn test_timeline_samples() {
        let projection = project(1_000.0, 100.0, 3, 6.0, 3.0).unwrap();
        let months: Vec<u32> = projection.timeline.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![1, 13, 25, 36]);

        let years: Vec<u32> = projection.timeline.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![1, 2, 3, 3]);

        let last = projection.timeline.last().unwrap();
        assert_eq!(last.value, projection.final_amount);
        assert_eq!(last.total_deposits, 4_600.0);
    }

    #[test]
    fn test_zero_deposits_guarded() {
        let projection = project(0.0, 0.0, 5, 7.0, 3.0).unwrap();
        assert_eq!(projection.final_amount, 0.0);
        assert_eq!(projection.annualized_return, None);
        assert_eq!(projection.earnings_percentage, 0.0);
        assert_eq!(projection.purchasing_power_loss, 0.0);
        assert!(projection.milestones.is_empty());
    }

    #[test]
    fn test_annualized_return_for_lump_sum() {
        let projection = project(10_000.0, 0.0, 10, 12.0, 3.0).unwrap();
        // 1% a month compounds to about 12.68% a year
        assert_eq!(projection.annualized_return, Some(12.68));
    }

    #[test]
    fn test_inflation_adjustment() {
        let projection = project(10_000.0, 0.0, 1, 0.0, 10.0).unwrap();
        assert_eq!(projection.final_amount, 10_000.0);
        assert_eq!(projection.real_value, 9_090.91);
        assert_eq!(projection.purchasing_power_loss, 9.09);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(project(-1.0, 0.0, 1, 5.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, -5.0, 1, 5.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, 5.0, 0, 5.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, 5.0, 1, -100.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, 5.0, 101, 5.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, 5.0, u32::MAX, 5.0, 3.0).unwrap_err().is_invalid_input());
        assert!(project(0.0, 5.0, 100, 5.0, 3.0).is_ok());
    }

    #[test]
    fn test_milestones_linear_estimate() {
        let found = milestones(120_000.0, 12, &DEFAULT_MILESTONES);
        let amounts: Vec<f64> = found.iter().map(|m| m.amount).collect();
        assert_eq!(amounts, vec![10_000.0, 50_000.0, 100_000.0]);
        assert_eq!(found[0].years_to_reach, 1.0);
        assert_eq!(found[1].years_to_reach, 5.0);
        assert_eq!(found[2].percentage, 83.33);
    }

    #[test]
    fn test_savings_advice() {
        let projection = project(0.0, 200.0, 3, 4.0, 3.0).unwrap();
        assert_eq!(projection.advice.len(), 3);

        let projection = project(0.0, 1_000.0, 20, 8.0, 3.0).unwrap();
        assert!(projection.advice.is_empty());
    }

    #[test]
    fn test_strategies() {
        assert_eq!(InvestmentStrategy::from_name("Aggressive"), InvestmentStrategy::Aggressive);
        assert_eq!(InvestmentStrategy::from_name("yolo"), InvestmentStrategy::Moderate);
        assert_eq!(InvestmentStrategy::Conservative.annual_return(), 4.0);

        let projection =
            project_investment(10_000.0, InvestmentStrategy::Aggressive, 5, 3.0).unwrap();
        assert_eq!(projection.annual_return, 12.0);
        assert_eq!(projection.monthly_deposit, 0.0);
        let expected = reference_loop(10_000.0, 0.0, 5, 12.0);
        assert!((projection.final_amount - expected).abs() < 0.01);
    }
}
