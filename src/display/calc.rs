//! Calculator result formatting
//!
//! Schedules and timelines are rendered as tables; everything else is a
//! label/value block followed by the advice list.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::{format_money, format_percentage, separator};
use crate::calc::{
    Advice, AffordabilityRating, LoanResult, MortgageResult, SavingsProjection, ScheduleEntry,
    TimelinePoint,
};
use crate::models::CalculationRecord;

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Paid")]
    paid: String,
}

#[derive(Tabled)]
struct TimelineRow {
    #[tabled(rename = "Year")]
    year: u32,
    #[tabled(rename = "Month")]
    month: u32,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Deposits")]
    deposits: String,
    #[tabled(rename = "Earnings")]
    earnings: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// Amortization schedule as a table
pub fn format_schedule(schedule: &[ScheduleEntry], symbol: &str) -> String {
    let rows: Vec<ScheduleRow> = schedule
        .iter()
        .map(|e| ScheduleRow {
            month: e.month,
            payment: format_money(e.payment, symbol),
            principal: format_money(e.principal, symbol),
            interest: format_money(e.interest, symbol),
            balance: format_money(e.remaining_balance, symbol),
            paid: format_percentage(e.percentage_paid),
        })
        .collect();
    render(rows)
}

/// Savings timeline as a table
pub fn format_timeline(timeline: &[TimelinePoint], symbol: &str) -> String {
    let rows: Vec<TimelineRow> = timeline
        .iter()
        .map(|p| TimelineRow {
            year: p.year,
            month: p.month,
            value: format_money(p.value, symbol),
            deposits: format_money(p.total_deposits, symbol),
            earnings: format_money(p.total_earnings, symbol),
        })
        .collect();
    render(rows)
}

fn push_advice(output: &mut String, advice: &[Advice]) {
    if advice.is_empty() {
        return;
    }
    output.push_str("\nAdvice:\n");
    for item in advice {
        output.push_str(&format!("  [{}] {}\n", item.level, item.message));
        if !item.suggestion.is_empty() {
            output.push_str(&format!("         {}\n", item.suggestion));
        }
    }
}

fn line(output: &mut String, label: &str, value: impl std::fmt::Display) {
    output.push_str(&format!("{:<22}{}\n", label, value));
}

/// Format a personal-loan analysis
pub fn format_loan(result: &LoanResult, symbol: &str) -> String {
    let mut output = String::new();
    let totals = &result.totals;

    output.push_str("Personal Loan\n");
    output.push_str(&separator(50));
    output.push('\n');
    line(&mut output, "Principal:", format_money(result.principal, symbol));
    line(&mut output, "Term:", format!("{} months", result.term_months));
    line(&mut output, "Annual rate:", format!("{}%", result.annual_rate));
    line(&mut output, "Monthly payment:", format_money(result.monthly_payment, symbol));
    line(&mut output, "Total repaid:", format_money(totals.total_payment, symbol));
    line(
        &mut output,
        "Total interest:",
        format!(
            "{} ({} of principal)",
            format_money(totals.total_interest, symbol),
            format_percentage(totals.interest_percentage)
        ),
    );
    if totals.total_fees > 0.0 {
        line(&mut output, "  Processing fee:", format_money(totals.fees.processing, symbol));
        line(&mut output, "  Insurance:", format_money(totals.fees.insurance, symbol));
        line(&mut output, "  Other fees:", format_money(totals.fees.other, symbol));
        line(&mut output, "Total fees:", format_money(totals.total_fees, symbol));
    }
    line(&mut output, "Total cost:", format_money(totals.total_cost, symbol));
    match result.effective_rate {
        Some(rate) => line(&mut output, "Effective rate:", format!("{:.2}%", rate)),
        None => line(&mut output, "Effective rate:", "n/a"),
    }

    push_advice(&mut output, &result.advice);

    if !result.schedule.is_empty() {
        output.push('\n');
        output.push_str(&format_schedule(&result.schedule, symbol));
        output.push('\n');
    }

    output
}

/// Format a mortgage analysis
pub fn format_mortgage(result: &MortgageResult, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str("Mortgage\n");
    output.push_str(&separator(50));
    output.push('\n');
    line(&mut output, "Property price:", format_money(result.property_price, symbol));
    line(
        &mut output,
        "Down payment:",
        format!(
            "{} ({})",
            format_money(result.down_payment, symbol),
            format_percentage(result.down_payment_percentage)
        ),
    );
    line(&mut output, "Loan amount:", format_money(result.loan_amount, symbol));
    line(&mut output, "Loan to value:", format_percentage(result.loan_to_value));
    line(
        &mut output,
        "Term:",
        format!("{} years ({} months)", result.term_years, result.term_months),
    );
    line(&mut output, "Annual rate:", format!("{}%", result.annual_rate));
    line(&mut output, "Monthly payment:", format_money(result.monthly_payment, symbol));
    line(&mut output, "Total repaid:", format_money(result.total_payment, symbol));
    line(&mut output, "Total interest:", format_money(result.total_interest, symbol));

    output.push_str("\nFees:\n");
    line(&mut output, "  Registration:", format_money(result.fees.registration, symbol));
    line(&mut output, "  Valuation:", format_money(result.fees.valuation, symbol));
    line(&mut output, "  Brokerage:", format_money(result.fees.brokerage, symbol));
    line(&mut output, "  Maintenance:", format_money(result.fees.maintenance, symbol));
    line(&mut output, "Total fees:", format_money(result.total_fees, symbol));
    line(&mut output, "Upfront cost:", format_money(result.upfront_cost, symbol));
    line(&mut output, "Total cost:", format_money(result.total_cost, symbol));

    let afford = &result.affordability;
    output.push_str("\nAffordability:\n");
    for scenario in &afford.scenarios {
        output.push_str(&format!(
            "  income {:>14}  max payment {:>12}  {}\n",
            format_money(scenario.income, symbol),
            format_money(scenario.max_payment, symbol),
            if scenario.affordable { "affordable" } else { "too high" }
        ));
    }
    line(
        &mut output,
        "Min. monthly income:",
        format_money(afford.min_required_income, symbol),
    );
    line(
        &mut output,
        "Rating:",
        match afford.rating {
            AffordabilityRating::Good => "good",
            AffordabilityRating::Poor => "poor",
        },
    );

    if let Some(rental) = &result.rental_yield {
        output.push_str("\nRental yield:\n");
        line(&mut output, "  Monthly rent:", format_money(rental.monthly_rent, symbol));
        line(&mut output, "  Gross yield:", format!("{:.2}%", rental.gross_yield));
        line(&mut output, "  Net yield:", format!("{:.2}%", rental.net_yield));
        match rental.years_to_break_even {
            Some(years) => line(&mut output, "  Break even:", format!("{:.1} years", years)),
            None => line(&mut output, "  Break even:", "never"),
        }
    }

    push_advice(&mut output, &result.advice);
    output
}

/// Format a savings or investment projection
pub fn format_savings(result: &SavingsProjection, symbol: &str, show_timeline: bool) -> String {
    let mut output = String::new();

    output.push_str("Savings Projection\n");
    output.push_str(&separator(50));
    output.push('\n');
    line(&mut output, "Initial amount:", format_money(result.initial_amount, symbol));
    line(&mut output, "Monthly deposit:", format_money(result.monthly_deposit, symbol));
    line(&mut output, "Horizon:", format!("{} years", result.years));
    line(&mut output, "Annual return:", format!("{}%", result.annual_return));
    line(&mut output, "Final amount:", format_money(result.final_amount, symbol));
    line(&mut output, "Total deposits:", format_money(result.total_deposits, symbol));
    line(
        &mut output,
        "Total earnings:",
        format!(
            "{} ({})",
            format_money(result.total_earnings, symbol),
            format_percentage(result.earnings_percentage)
        ),
    );
    if let Some(annualized) = result.annualized_return {
        line(&mut output, "Annualized return:", format!("{:.2}%", annualized));
    }
    line(
        &mut output,
        "Real value:",
        format!(
            "{} at {}% inflation ({} purchasing power lost)",
            format_money(result.real_value, symbol),
            result.inflation,
            format_percentage(result.purchasing_power_loss)
        ),
    );

    if !result.milestones.is_empty() {
        output.push_str("\nMilestones:\n");
        for milestone in &result.milestones {
            output.push_str(&format!(
                "  {:>16}  ~{:.1} years\n",
                format_money(milestone.amount, symbol),
                milestone.years_to_reach
            ));
        }
    }

    push_advice(&mut output, &result.advice);

    if show_timeline && !result.timeline.is_empty() {
        output.push('\n');
        output.push_str(&format_timeline(&result.timeline, symbol));
        output.push('\n');
    }

    output
}

/// Format saved calculations, newest first
pub fn format_history(records: &[CalculationRecord]) -> String {
    if records.is_empty() {
        return "No saved calculations.\n".to_string();
    }

    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{}  {:<10} {}\n",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.result.kind(),
            record.result.headline()
        ));
    }
    output
}
