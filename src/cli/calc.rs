//! Calculator CLI commands
//!
//! Every finished loan, mortgage, savings and investment calculation is saved
//! to the history unless `--no-save` is given.

use clap::Subcommand;

use crate::calc::{
    compute_loan, compute_mortgage, project, project_investment, solve_effective_rate, FeeRates,
    InvestmentStrategy, MortgageOptions,
};
use crate::config::settings::Settings;
use crate::display::calc::{format_history, format_loan, format_mortgage, format_savings};
use crate::display::format_money;
use crate::error::PocketResult;
use crate::models::CalculationResult;
use crate::services::{CalculationHistory, DEFAULT_RECENT};
use crate::storage::Storage;

/// Calculator subcommands
#[derive(Subcommand)]
pub enum CalcCommands {
    /// Personal loan: installment, totals, fees and effective rate
    Loan {
        /// Amount borrowed
        principal: f64,
        /// Term in months
        months: u32,
        /// Annual interest rate in percent
        rate: f64,
        /// Processing fee as a fraction of the principal
        #[arg(long, default_value = "0.01")]
        processing_fee: f64,
        /// Insurance as a fraction of the principal
        #[arg(long, default_value = "0.005")]
        insurance: f64,
        /// Other fees as a fixed amount
        #[arg(long, default_value = "0")]
        other_fees: f64,
        /// Print the month-by-month schedule
        #[arg(short, long)]
        schedule: bool,
        /// Do not save to the calculation history
        #[arg(long)]
        no_save: bool,
    },

    /// Mortgage: installment, fees, affordability and rental yield
    Mortgage {
        /// Property price
        price: f64,
        /// Down payment
        down: f64,
        /// Term in years
        years: u32,
        /// Annual interest rate in percent
        rate: f64,
        /// Expected annual rent, enables the rental-yield analysis
        #[arg(long)]
        rent: Option<f64>,
        /// Annual maintenance cost, instead of 1% of the price
        #[arg(long)]
        maintenance: Option<f64>,
        /// Do not save to the calculation history
        #[arg(long)]
        no_save: bool,
    },

    /// Savings plan with monthly deposits
    Savings {
        /// Monthly deposit
        deposit: f64,
        /// Horizon in years
        years: u32,
        /// Expected annual return in percent
        rate: f64,
        /// Starting balance
        #[arg(short, long, default_value = "0")]
        initial: f64,
        /// Annual inflation in percent, defaults to the configured value
        #[arg(long)]
        inflation: Option<f64>,
        /// Print the yearly timeline
        #[arg(short, long)]
        timeline: bool,
        /// Do not save to the calculation history
        #[arg(long)]
        no_save: bool,
    },

    /// Lump-sum investment under a preset strategy
    Invest {
        /// Amount invested
        amount: f64,
        /// Horizon in years
        years: u32,
        /// conservative (4%), moderate (8%) or aggressive (12%)
        #[arg(short, long, default_value = "moderate")]
        strategy: String,
        /// Annual inflation in percent, defaults to the configured value
        #[arg(long)]
        inflation: Option<f64>,
        /// Print the yearly timeline
        #[arg(short, long)]
        timeline: bool,
        /// Do not save to the calculation history
        #[arg(long)]
        no_save: bool,
    },

    /// Annual rate implied by a principal, a monthly payment and a term
    Rate {
        /// Amount borrowed
        principal: f64,
        /// Monthly payment
        payment: f64,
        /// Term in months
        months: u32,
    },

    /// Show or clear saved calculations
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = DEFAULT_RECENT)]
        limit: usize,
        /// Delete all saved calculations
        #[arg(long)]
        clear: bool,
    },
}

/// Handle a calculator command
pub fn handle_calc_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CalcCommands,
) -> PocketResult<()> {
    let history = CalculationHistory::new(storage, settings.history_limit);
    let symbol = settings.currency_symbol.as_str();

    let save = |result: CalculationResult, no_save: bool| -> PocketResult<()> {
        if !no_save {
            history.record(result)?;
        }
        Ok(())
    };

    match cmd {
        CalcCommands::Loan {
            principal,
            months,
            rate,
            processing_fee,
            insurance,
            other_fees,
            schedule,
            no_save,
        } => {
            let fees = FeeRates {
                processing: processing_fee,
                insurance,
                other: other_fees,
            };
            let result = compute_loan(principal, months, rate, &fees, schedule)?;
            print!("{}", format_loan(&result, symbol));

            // keep history entries compact
            let mut saved = result;
            saved.schedule.clear();
            save(CalculationResult::Loan(saved), no_save)?;
        }

        CalcCommands::Mortgage {
            price,
            down,
            years,
            rate,
            rent,
            maintenance,
            no_save,
        } => {
            let options = MortgageOptions {
                annual_rent: rent,
                annual_maintenance: maintenance,
                ..MortgageOptions::default()
            };
            let result = compute_mortgage(price, down, years, rate, &options)?;
            print!("{}", format_mortgage(&result, symbol));
            save(CalculationResult::Mortgage(result), no_save)?;
        }

        CalcCommands::Savings {
            deposit,
            years,
            rate,
            initial,
            inflation,
            timeline,
            no_save,
        } => {
            let inflation = inflation.unwrap_or(settings.inflation_percent);
            let result = project(initial, deposit, years, rate, inflation)?;
            print!("{}", format_savings(&result, symbol, timeline));
            save(CalculationResult::Savings(result), no_save)?;
        }

        CalcCommands::Invest {
            amount,
            years,
            strategy,
            inflation,
            timeline,
            no_save,
        } => {
            let strategy = InvestmentStrategy::from_name(&strategy);
            let inflation = inflation.unwrap_or(settings.inflation_percent);
            let result = project_investment(amount, strategy, years, inflation)?;
            println!(
                "Strategy: {} ({}% a year)",
                strategy,
                strategy.annual_return()
            );
            print!("{}", format_savings(&result, symbol, timeline));
            save(CalculationResult::Investment(result), no_save)?;
        }

        CalcCommands::Rate {
            principal,
            payment,
            months,
        } => {
            let rate = solve_effective_rate(principal, payment, months)?;
            println!(
                "Paying {} a month for {} months on {} implies {:.2}% a year",
                format_money(payment, symbol),
                months,
                format_money(principal, symbol),
                rate
            );
        }

        CalcCommands::History { limit, clear } => {
            if clear {
                let count = history.clear()?;
                println!("Deleted {} saved calculations", count);
            } else {
                print!("{}", format_history(&history.recent(limit)?));
            }
        }
    }

    Ok(())
}
