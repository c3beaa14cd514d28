//! Loan and mortgage amortization
//!
//! Fixed-installment (annuity) loans with monthly compounding. Every function
//! validates its inputs and fails with `PocketError::InvalidInput` rather than
//! coercing them: a negative rate is rejected, never clamped to zero.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{round2, round_to, Advice, AdviceLevel, MAX_TERM_MONTHS};
use crate::error::{PocketError, PocketResult};

/// Solver starting point, as an annual fraction (1%)
pub const SOLVER_START_RATE: f64 = 0.01;

/// Largest payment difference the solver accepts, in currency units
pub const SOLVER_TOLERANCE: f64 = 0.0001;

/// Iteration budget for the solver
pub const SOLVER_MAX_ITERATIONS: u32 = 100;

/// Monthly income assumed when judging loan affordability
const ASSUMED_MONTHLY_INCOME: f64 = 10_000.0;

/// Share of income a housing payment may take in the affordability table
const MAX_PAYMENT_SHARE: f64 = 0.4;

/// Incomes checked by the affordability table
const AFFORDABILITY_INCOMES: [f64; 4] = [10_000.0, 15_000.0, 20_000.0, 30_000.0];

/// Share of gross rent assumed to survive expenses
const NET_YIELD_FACTOR: f64 = 0.7;

/// One month of an amortization schedule
///
/// Every field is rounded to cents for display; the running balance behind
/// them is kept unrounded so rounding never compounds into later months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
    pub percentage_paid: f64,
}

/// Loan fee configuration
///
/// `processing` and `insurance` are fractions of the principal; `other` is an
/// absolute amount. All default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeRates {
    #[serde(default)]
    pub processing: f64,
    #[serde(default)]
    pub insurance: f64,
    #[serde(default)]
    pub other: f64,
}

impl FeeRates {
    /// Typical retail-loan fees: 1% processing and 0.5% insurance
    pub fn standard() -> Self {
        Self {
            processing: 0.01,
            insurance: 0.005,
            other: 0.0,
        }
    }

    fn validate(&self) -> PocketResult<()> {
        for (name, value) in [
            ("processing", self.processing),
            ("insurance", self.insurance),
            ("other", self.other),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PocketError::InvalidInput(format!(
                    "{} fee cannot be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Fee amounts charged on a loan
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub processing: f64,
    pub insurance: f64,
    pub other: f64,
}

impl FeeBreakdown {
    pub fn total(&self) -> f64 {
        self.processing + self.insurance + self.other
    }
}

/// Aggregate cost of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTotals {
    pub total_payment: f64,
    pub total_interest: f64,
    pub fees: FeeBreakdown,
    pub total_fees: f64,
    /// Repayments plus fees
    pub total_cost: f64,
    /// Interest as a percentage of the principal
    pub interest_percentage: f64,
}

/// Full personal-loan analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub principal: f64,
    pub term_months: u32,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub totals: LoanTotals,
    /// Rate implied once upfront fees are netted out of the principal;
    /// `None` when the solver gives up
    pub effective_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<ScheduleEntry>,
    pub advice: Vec<Advice>,
}

/// Property-specific mortgage options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageOptions {
    /// Registration fee as a fraction of the price
    pub registration_rate: f64,
    /// Fixed valuation fee
    pub valuation_fee: f64,
    /// Brokerage fee as a fraction of the price
    pub brokerage_rate: f64,
    /// Annual maintenance as a fraction of the price
    pub maintenance_rate: f64,
    /// Absolute annual maintenance, overriding `maintenance_rate`
    pub annual_maintenance: Option<f64>,
    /// Expected annual rent, enables the rental-yield analysis
    pub annual_rent: Option<f64>,
}

impl Default for MortgageOptions {
    fn default() -> Self {
        Self {
            registration_rate: 0.05,
            valuation_fee: 2_000.0,
            brokerage_rate: 0.02,
            maintenance_rate: 0.01,
            annual_maintenance: None,
            annual_rent: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageFees {
    pub registration: f64,
    pub valuation: f64,
    pub brokerage: f64,
    pub maintenance: f64,
}

impl MortgageFees {
    pub fn total(&self) -> f64 {
        self.registration + self.valuation + self.brokerage + self.maintenance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffordabilityRating {
    Good,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityScenario {
    pub income: f64,
    pub max_payment: f64,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affordability {
    pub monthly_payment: f64,
    pub scenarios: Vec<AffordabilityScenario>,
    /// Lowest listed income that covers the payment, or the income the
    /// payment implies when none does
    pub min_required_income: f64,
    pub rating: AffordabilityRating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentalYield {
    pub annual_rent: f64,
    pub monthly_rent: f64,
    pub gross_yield: f64,
    /// Gross yield after a flat 30% expense assumption
    pub net_yield: f64,
    pub years_to_break_even: Option<f64>,
}

/// Full mortgage analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub property_price: f64,
    pub down_payment: f64,
    pub down_payment_percentage: f64,
    pub loan_amount: f64,
    pub loan_to_value: f64,
    pub term_years: u32,
    pub term_months: u32,
    pub annual_rate: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub fees: MortgageFees,
    pub total_fees: f64,
    /// Price plus interest plus fees
    pub total_cost: f64,
    /// Cash needed at signing: down payment, registration and brokerage
    pub upfront_cost: f64,
    pub affordability: Affordability,
    pub rental_yield: Option<RentalYield>,
    pub advice: Vec<Advice>,
}

fn validate_loan_inputs(principal: f64, term_months: u32, annual_rate_percent: f64) -> PocketResult<()> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Principal must be positive, got {}",
            principal
        )));
    }
    if term_months == 0 {
        return Err(PocketError::InvalidInput(
            "Term must be at least one month".into(),
        ));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(PocketError::InvalidInput(format!(
            "Term cannot exceed {} months, got {}",
            MAX_TERM_MONTHS, term_months
        )));
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Interest rate cannot be negative, got {}",
            annual_rate_percent
        )));
    }
    Ok(())
}

/// Annuity payment for a monthly rate; straight-line when the rate is zero
fn installment(principal: f64, term_months: u32, monthly_rate: f64) -> f64 {
    if monthly_rate == 0.0 {
        return principal / f64::from(term_months);
    }
    let growth = (1.0 + monthly_rate).powf(f64::from(term_months));
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Monthly payment for an amortizing loan
///
/// `payment = P·r·(1+r)^n / ((1+r)^n − 1)` with `r = annual% / 100 / 12`, or
/// `P / n` when the rate is zero.
pub fn compute_installment(
    principal: f64,
    term_months: u32,
    annual_rate_percent: f64,
) -> PocketResult<f64> {
    validate_loan_inputs(principal, term_months, annual_rate_percent)?;
    Ok(installment(
        principal,
        term_months,
        annual_rate_percent / 100.0 / 12.0,
    ))
}

/// Lazily amortize a validated loan, one entry per month
fn schedule_entries(
    principal: f64,
    term_months: u32,
    monthly_rate: f64,
) -> impl Iterator<Item = ScheduleEntry> {
    let payment = installment(principal, term_months, monthly_rate);
    let mut balance = principal;
    let mut cumulative_interest = 0.0;
    let mut cumulative_principal = 0.0;

    (1..=term_months).map_while(move |month| {
        if balance <= 0.0 {
            return None;
        }

        let interest = balance * monthly_rate;
        let principal_part = payment - interest;
        balance -= principal_part;
        cumulative_interest += interest;
        cumulative_principal += principal_part;

        Some(ScheduleEntry {
            month,
            payment: round2(payment),
            principal: round2(principal_part),
            interest: round2(interest),
            remaining_balance: round2(balance.max(0.0)),
            cumulative_interest: round2(cumulative_interest),
            cumulative_principal: round2(cumulative_principal),
            percentage_paid: round2(cumulative_principal / principal * 100.0),
        })
    })
}

/// Month-by-month amortization schedule
///
/// Stops early if the balance reaches zero before the term ends. The final
/// remaining balance is floored at zero.
pub fn build_schedule(
    principal: f64,
    term_months: u32,
    annual_rate_percent: f64,
) -> PocketResult<Vec<ScheduleEntry>> {
    validate_loan_inputs(principal, term_months, annual_rate_percent)?;
    Ok(schedule_entries(principal, term_months, annual_rate_percent / 100.0 / 12.0).collect())
}

/// Find the annual rate (percent) that reproduces `monthly_payment`
///
/// Starts at 1% and moves the rate by 10% of itself per step, down when the
/// candidate payment is too high and up when too low. Once the target has been
/// overshot in both directions the search bisects the bracketed interval.
/// This is a best-effort root finder: if the payment difference is still above
/// [`SOLVER_TOLERANCE`] after [`SOLVER_MAX_ITERATIONS`] steps it fails with
/// `PocketError::Convergence` instead of returning the unconverged estimate.
pub fn solve_effective_rate(
    principal: f64,
    monthly_payment: f64,
    term_months: u32,
) -> PocketResult<f64> {
    validate_loan_inputs(principal, term_months, 0.0)?;
    if !monthly_payment.is_finite() || monthly_payment <= 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Monthly payment must be positive, got {}",
            monthly_payment
        )));
    }

    let mut rate = SOLVER_START_RATE;
    let mut below: Option<f64> = None;
    let mut above: Option<f64> = None;

    for iteration in 0..SOLVER_MAX_ITERATIONS {
        let diff = installment(principal, term_months, rate / 12.0) - monthly_payment;

        if diff.abs() < SOLVER_TOLERANCE {
            debug!(iteration, rate = rate * 100.0, "effective rate converged");
            return Ok(rate * 100.0);
        }

        if diff > 0.0 {
            above = Some(rate);
        } else {
            below = Some(rate);
        }

        rate = match (below, above) {
            (Some(lo), Some(hi)) => (lo + hi) / 2.0,
            _ if diff > 0.0 => rate - rate * 0.1,
            _ => rate + rate * 0.1,
        };
    }

    warn!(
        principal,
        monthly_payment, term_months, "effective rate solver did not converge"
    );
    Err(PocketError::Convergence {
        iterations: SOLVER_MAX_ITERATIONS,
        last_rate: rate * 100.0,
    })
}

/// Totals and fees for a schedule
///
/// Totals come from the schedule's unrounded running sums (exposed through
/// the last entry), so they match `payment × months` rather than a sum of
/// rounded payments.
pub fn compute_fees_and_totals(
    principal: f64,
    schedule: &[ScheduleEntry],
    fee_rates: &FeeRates,
) -> PocketResult<LoanTotals> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Principal must be positive, got {}",
            principal
        )));
    }
    fee_rates.validate()?;

    let (total_interest, total_principal) = schedule
        .last()
        .map(|e| (e.cumulative_interest, e.cumulative_principal))
        .unwrap_or((0.0, 0.0));
    let total_payment = total_interest + total_principal;

    let fees = FeeBreakdown {
        processing: round2(principal * fee_rates.processing),
        insurance: round2(principal * fee_rates.insurance),
        other: round2(fee_rates.other),
    };
    let total_fees = round2(fees.total());

    Ok(LoanTotals {
        total_payment: round2(total_payment),
        total_interest: round2(total_interest),
        fees,
        total_fees,
        total_cost: round2(total_payment + total_fees),
        interest_percentage: round2(total_interest / principal * 100.0),
    })
}

fn loan_advice(term_months: u32, annual_rate_percent: f64, monthly_payment: f64) -> Vec<Advice> {
    let mut advice = Vec::new();

    let payment_ratio = monthly_payment / ASSUMED_MONTHLY_INCOME * 100.0;
    if payment_ratio > 40.0 {
        advice.push(Advice::new(
            AdviceLevel::Danger,
            "Monthly payment is very high relative to income",
            "Consider a longer term or a smaller loan",
        ));
    } else if payment_ratio > 30.0 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Monthly payment is relatively high",
            "Make sure the payment fits your budget",
        ));
    }

    if term_months > 60 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Long loan term",
            "Longer terms increase the total interest paid",
        ));
    }

    if annual_rate_percent > 15.0 {
        advice.push(Advice::new(
            AdviceLevel::Danger,
            "High interest rate",
            "Shop around or improve your credit score",
        ));
    } else if annual_rate_percent > 10.0 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Moderate interest rate",
            "Better rates may be available",
        ));
    }

    advice
}

/// Analyse a personal loan
pub fn compute_loan(
    principal: f64,
    term_months: u32,
    annual_rate_percent: f64,
    fee_rates: &FeeRates,
    include_schedule: bool,
) -> PocketResult<LoanResult> {
    let payment = compute_installment(principal, term_months, annual_rate_percent)?;

    // totals only need the final running sums
    let entries = schedule_entries(principal, term_months, annual_rate_percent / 100.0 / 12.0);
    let schedule: Vec<ScheduleEntry> = if include_schedule {
        entries.collect()
    } else {
        entries.last().into_iter().collect()
    };
    let totals = compute_fees_and_totals(principal, &schedule, fee_rates)?;

    let net_principal = principal - totals.total_fees;
    let effective_rate = if net_principal > 0.0 {
        solve_effective_rate(net_principal, payment, term_months)
            .ok()
            .map(round2)
    } else {
        None
    };

    debug!(
        principal,
        term_months,
        annual_rate_percent,
        payment,
        "computed personal loan"
    );

    Ok(LoanResult {
        principal,
        term_months,
        annual_rate: annual_rate_percent,
        monthly_payment: round2(payment),
        totals,
        effective_rate,
        schedule: if include_schedule { schedule } else { Vec::new() },
        advice: loan_advice(term_months, annual_rate_percent, payment),
    })
}

/// Affordability table for a monthly payment
pub fn affordability(monthly_payment: f64) -> Affordability {
    let scenarios: Vec<AffordabilityScenario> = AFFORDABILITY_INCOMES
        .iter()
        .map(|&income| {
            let max_payment = income * MAX_PAYMENT_SHARE;
            AffordabilityScenario {
                income,
                max_payment,
                affordable: monthly_payment <= max_payment,
            }
        })
        .collect();

    let lowest = scenarios
        .iter()
        .filter(|s| s.affordable)
        .map(|s| s.income)
        .reduce(f64::min);

    Affordability {
        monthly_payment,
        min_required_income: lowest.unwrap_or_else(|| round2(monthly_payment / MAX_PAYMENT_SHARE)),
        rating: if lowest.is_some() {
            AffordabilityRating::Good
        } else {
            AffordabilityRating::Poor
        },
        scenarios,
    }
}

/// Rental yield for a property
pub fn rental_yield(property_price: f64, annual_rent: f64) -> PocketResult<RentalYield> {
    if !property_price.is_finite() || property_price <= 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Property price must be positive, got {}",
            property_price
        )));
    }
    if !annual_rent.is_finite() || annual_rent < 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Annual rent cannot be negative, got {}",
            annual_rent
        )));
    }

    let gross_yield = annual_rent / property_price * 100.0;
    let net_yield = gross_yield * NET_YIELD_FACTOR;
    let years_to_break_even = (net_yield > 0.0).then(|| round_to(100.0 / net_yield, 1));

    Ok(RentalYield {
        annual_rent,
        monthly_rent: round2(annual_rent / 12.0),
        gross_yield: round2(gross_yield),
        net_yield: round2(net_yield),
        years_to_break_even,
    })
}

fn mortgage_advice(down_payment_percentage: f64, term_years: u32, annual_rate_percent: f64) -> Vec<Advice> {
    let mut advice = Vec::new();

    if down_payment_percentage < 20.0 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "Down payment is below 20%",
            "A larger down payment reduces interest and insurance",
        ));
    }

    if term_years > 25 {
        advice.push(Advice::new(
            AdviceLevel::Info,
            "Long financing term",
            "Long terms raise the total interest considerably",
        ));
    }

    if annual_rate_percent > 6.0 {
        advice.push(Advice::new(
            AdviceLevel::Warning,
            "High mortgage rate",
            "Check whether the rate is fixed or consider a fixed-rate product",
        ));
    }

    advice
}

/// Analyse a mortgage
///
/// The financed amount is `property_price − down_payment`; the amortization
/// itself is the personal-loan engine with no loan fees.
pub fn compute_mortgage(
    property_price: f64,
    down_payment: f64,
    term_years: u32,
    annual_rate_percent: f64,
    options: &MortgageOptions,
) -> PocketResult<MortgageResult> {
    if !property_price.is_finite() || property_price <= 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Property price must be positive, got {}",
            property_price
        )));
    }
    if !down_payment.is_finite() || down_payment < 0.0 {
        return Err(PocketError::InvalidInput(format!(
            "Down payment cannot be negative, got {}",
            down_payment
        )));
    }

    let loan_amount = property_price - down_payment;
    if loan_amount <= 0.0 {
        return Err(PocketError::InvalidInput(
            "Down payment must be less than the property price".into(),
        ));
    }

    let term_months = term_years
        .checked_mul(12)
        .ok_or_else(|| PocketError::InvalidInput(format!("Term too long: {} years", term_years)))?;

    for (name, value) in [
        ("registration rate", options.registration_rate),
        ("valuation fee", options.valuation_fee),
        ("brokerage rate", options.brokerage_rate),
        ("maintenance rate", options.maintenance_rate),
        ("annual maintenance", options.annual_maintenance.unwrap_or(0.0)),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PocketError::InvalidInput(format!(
                "{} cannot be negative, got {}",
                name, value
            )));
        }
    }

    let loan = compute_loan(
        loan_amount,
        term_months,
        annual_rate_percent,
        &FeeRates::default(),
        false,
    )?;

    let fees = MortgageFees {
        registration: round2(property_price * options.registration_rate),
        valuation: round2(options.valuation_fee),
        brokerage: round2(property_price * options.brokerage_rate),
        maintenance: round2(
            options
                .annual_maintenance
                .unwrap_or(property_price * options.maintenance_rate),
        ),
    };
    let total_fees = round2(fees.total());

    let rental = options
        .annual_rent
        .map(|rent| rental_yield(property_price, rent))
        .transpose()?;

    let down_payment_percentage = round2(down_payment / property_price * 100.0);

    debug!(property_price, loan_amount, term_years, "computed mortgage");

    Ok(MortgageResult {
        property_price,
        down_payment,
        down_payment_percentage,
        loan_amount,
        loan_to_value: round2(loan_amount / property_price * 100.0),
        term_years,
        term_months,
        annual_rate: annual_rate_percent,
        monthly_payment: loan.monthly_payment,
        total_payment: loan.totals.total_payment,
        total_interest: loan.totals.total_interest,
        fees,
        total_fees,
        total_cost: round2(property_price + loan.totals.total_interest + total_fees),
        upfront_cost: round2(down_payment + fees.registration + fees.brokerage),
        affordability: affordability(loan.monthly_payment),
        rental_yield: rental,
        advice: mortgage_advice(down_payment_percentage, term_years, annual_rate_percent),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_installment_reference_loan() {
        let payment = compute_installment(50_000.0, 36, 8.0).unwrap();
        assert!(close(payment, 1566.8183, 0.001), "payment was {}", payment);
    }

    #[test]
    fn test_installment_zero_rate_is_straight_line() {
        let payment = compute_installment(12_000.0, 24, 0.0).unwrap();
        assert!(close(payment, 500.0, 1e-9));

        let payment = compute_installment(1_000.0, 3, 0.0).unwrap();
        assert!(close(payment, 1_000.0 / 3.0, 1e-9));
    }

    #[test]
    fn test_installment_rejects_bad_input() {
        assert!(compute_installment(0.0, 12, 5.0).unwrap_err().is_invalid_input());
        assert!(compute_installment(-100.0, 12, 5.0).unwrap_err().is_invalid_input());
        assert!(compute_installment(1000.0, 0, 5.0).unwrap_err().is_invalid_input());
        assert!(compute_installment(1000.0, 12, -0.5).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_schedule_pays_off_principal() {
        for (principal, term, rate) in [
            (50_000.0, 36, 8.0),
            (250_000.0, 240, 3.5),
            (9_999.99, 7, 0.0),
            (1_000.0, 1, 12.0),
        ] {
            let schedule = build_schedule(principal, term, rate).unwrap();
            assert_eq!(schedule.len(), term as usize);

            let last = schedule.last().unwrap();
            assert_eq!(last.remaining_balance, 0.0);
            assert!(close(last.cumulative_principal, principal, 0.01));
            assert!(close(last.percentage_paid, 100.0, 0.01));

            // Rounded per-month principal still adds up to within a cent a month
            let sum: f64 = schedule.iter().map(|e| e.principal).sum();
            assert!(close(sum, principal, 0.005 * term as f64 + 1e-6));
        }
    }

    #[test]
    fn test_schedule_first_month_split() {
        let schedule = build_schedule(50_000.0, 36, 8.0).unwrap();
        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.interest, 333.33);
        assert_eq!(first.principal, 1233.48);
        assert_eq!(first.payment, 1566.82);
        assert_eq!(first.remaining_balance, 48766.52);
    }

    #[test]
    fn test_schedule_balance_is_monotonic() {
        let schedule = build_schedule(80_000.0, 60, 6.5).unwrap();
        for pair in schedule.windows(2) {
            assert!(pair[1].remaining_balance < pair[0].remaining_balance);
            assert!(pair[1].interest <= pair[0].interest);
        }
    }

    #[test]
    fn test_solver_round_trip() {
        for (principal, term, rate) in [
            (50_000.0, 36, 8.0),
            (1_000_000.0, 360, 5.0),
            (10_000.0, 12, 30.0),
            (250_000.0, 240, 3.5),
            (5_000.0, 6, 0.5),
            (2_000_000.0, 360, 12.0),
        ] {
            let payment = compute_installment(principal, term, rate).unwrap();
            let solved = solve_effective_rate(principal, payment, term).unwrap();
            assert!(
                close(solved, rate, 1e-3),
                "expected {} got {} for {} over {}",
                rate,
                solved,
                principal,
                term
            );
        }
    }

    #[test]
    fn test_solver_reports_non_convergence() {
        // Only a zero rate reproduces a straight-line payment, which a search
        // that starts at 1% and scales multiplicatively cannot reach.
        let err = solve_effective_rate(50_000.0, 50_000.0 / 36.0, 36).unwrap_err();
        assert!(matches!(
            err,
            PocketError::Convergence {
                iterations: SOLVER_MAX_ITERATIONS,
                ..
            }
        ));
    }

    #[test]
    fn test_solver_rejects_bad_input() {
        assert!(solve_effective_rate(1_000.0, 0.0, 12).unwrap_err().is_invalid_input());
        assert!(solve_effective_rate(0.0, 100.0, 12).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_totals_without_fees() {
        let schedule = build_schedule(50_000.0, 36, 8.0).unwrap();
        let totals = compute_fees_and_totals(50_000.0, &schedule, &FeeRates::default()).unwrap();

        assert!(close(totals.total_interest, 6405.46, 0.01));
        assert!(close(totals.total_payment, 56405.46, 0.01));
        assert_eq!(totals.total_fees, 0.0);
        assert_eq!(totals.total_cost, totals.total_payment);
        assert!(close(totals.interest_percentage, 12.81, 0.01));
    }

    #[test]
    fn test_totals_with_fees() {
        let schedule = build_schedule(50_000.0, 36, 8.0).unwrap();
        let fees = FeeRates {
            other: 150.0,
            ..FeeRates::standard()
        };
        let totals = compute_fees_and_totals(50_000.0, &schedule, &fees).unwrap();

        assert_eq!(totals.fees.processing, 500.0);
        assert_eq!(totals.fees.insurance, 250.0);
        assert_eq!(totals.fees.other, 150.0);
        assert_eq!(totals.total_fees, 900.0);
        assert!(close(totals.total_cost, totals.total_payment + 900.0, 0.011));
    }

    #[test]
    fn test_negative_fee_rejected() {
        let schedule = build_schedule(1_000.0, 12, 5.0).unwrap();
        let fees = FeeRates {
            processing: -0.01,
            ..FeeRates::default()
        };
        assert!(compute_fees_and_totals(1_000.0, &schedule, &fees)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_loan_effective_rate_includes_fees() {
        let plain = compute_loan(50_000.0, 36, 8.0, &FeeRates::default(), false).unwrap();
        let with_fees = compute_loan(50_000.0, 36, 8.0, &FeeRates::standard(), true).unwrap();

        let plain_rate = plain.effective_rate.unwrap();
        assert!(close(plain_rate, 8.0, 0.01));
        assert!(with_fees.effective_rate.unwrap() > plain_rate);
        assert!(plain.schedule.is_empty());
        assert_eq!(with_fees.schedule.len(), 36);
    }

    #[test]
    fn test_loan_advice() {
        let loan = compute_loan(200_000.0, 72, 16.0, &FeeRates::default(), false).unwrap();
        let levels: Vec<_> = loan.advice.iter().map(|a| a.level).collect();
        assert!(levels.contains(&AdviceLevel::Danger));
        assert!(loan.advice.iter().any(|a| a.message == "Long loan term"));

        let calm = compute_loan(10_000.0, 24, 5.0, &FeeRates::default(), false).unwrap();
        assert!(calm.advice.is_empty());
    }

    #[test]
    fn test_mortgage_defaults() {
        let result =
            compute_mortgage(500_000.0, 100_000.0, 25, 5.0, &MortgageOptions::default()).unwrap();

        assert_eq!(result.loan_amount, 400_000.0);
        assert_eq!(result.term_months, 300);
        assert_eq!(result.down_payment_percentage, 20.0);
        assert_eq!(result.loan_to_value, 80.0);
        assert_eq!(result.fees.registration, 25_000.0);
        assert_eq!(result.fees.valuation, 2_000.0);
        assert_eq!(result.fees.brokerage, 10_000.0);
        assert_eq!(result.fees.maintenance, 5_000.0);
        assert_eq!(result.total_fees, 42_000.0);
        assert_eq!(result.upfront_cost, 135_000.0);
        assert!(close(
            result.total_cost,
            500_000.0 + result.total_interest + 42_000.0,
            0.01
        ));
        assert!(result.rental_yield.is_none());
        assert!(result.advice.is_empty());
    }

    #[test]
    fn test_term_above_cap_rejected() {
        let err = compute_mortgage(500_000.0, 100_000.0, 300_000_000, 5.0, &MortgageOptions::default())
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = compute_loan(50_000.0, MAX_TERM_MONTHS + 1, 8.0, &FeeRates::default(), false)
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(build_schedule(50_000.0, u32::MAX, 8.0).unwrap_err().is_invalid_input());

        let longest = compute_mortgage(500_000.0, 100_000.0, 100, 5.0, &MortgageOptions::default())
            .unwrap();
        assert_eq!(longest.term_months, MAX_TERM_MONTHS);
    }

    #[test]
    fn test_loan_totals_do_not_depend_on_schedule_flag() {
        let without = compute_loan(50_000.0, 36, 8.0, &FeeRates::standard(), false).unwrap();
        let with = compute_loan(50_000.0, 36, 8.0, &FeeRates::standard(), true).unwrap();
        assert_eq!(without.totals, with.totals);
        assert!(close(without.totals.total_interest, 6_405.46, 0.01));
    }

    #[test]
    fn test_mortgage_rejects_full_down_payment() {
        let err = compute_mortgage(300_000.0, 300_000.0, 20, 4.0, &MortgageOptions::default())
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_mortgage_with_rent_and_overrides() {
        let options = MortgageOptions {
            annual_maintenance: Some(1_200.0),
            annual_rent: Some(24_000.0),
            ..MortgageOptions::default()
        };
        let result = compute_mortgage(400_000.0, 40_000.0, 30, 7.0, &options).unwrap();

        assert_eq!(result.fees.maintenance, 1_200.0);
        let rental = result.rental_yield.unwrap();
        assert_eq!(rental.gross_yield, 6.0);
        assert_eq!(rental.net_yield, 4.2);
        assert_eq!(rental.monthly_rent, 2_000.0);
        assert_eq!(rental.years_to_break_even, Some(23.8));
        assert_eq!(result.advice.len(), 3);
    }

    #[test]
    fn test_affordability() {
        let table = affordability(5_000.0);
        assert_eq!(table.min_required_income, 15_000.0);
        assert_eq!(table.rating, AffordabilityRating::Good);
        assert!(!table.scenarios[0].affordable);
        assert!(table.scenarios[1].affordable);

        let table = affordability(20_000.0);
        assert_eq!(table.rating, AffordabilityRating::Poor);
        assert_eq!(table.min_required_income, 50_000.0);
    }

    #[test]
    fn test_rental_yield_zero_rent() {
        let rental = rental_yield(100_000.0, 0.0).unwrap();
        assert_eq!(rental.years_to_break_even, None);
    }
}
