use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use pocket_ledger::cli::{
    handle_bill_command, handle_budget_command, handle_calc_command, handle_category_command,
    handle_export_command, handle_goal_command, handle_import, handle_notify_command,
    handle_report_command, handle_transaction_command,
};
use pocket_ledger::config::{paths::PocketPaths, settings::Settings};
use pocket_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "pocket",
    author = "Kaylee Beyene",
    version,
    about = "Personal finance tracker for the terminal",
    long_about = "pocket-ledger keeps a ledger of income and expenses, tracks budgets \
                  and savings goals against it, raises alerts when they need attention, \
                  and includes loan, mortgage and savings calculators."
)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        /// Currency symbol used in output
        #[arg(long)]
        currency: Option<String>,
        /// Default inflation for savings projections, in percent
        #[arg(long)]
        inflation: Option<f64>,
        /// Number of calculations kept in history
        #[arg(long)]
        history_limit: Option<usize>,
        /// Date format for transaction output (strftime)
        #[arg(long)]
        date_format: Option<String>,
    },

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Tx(pocket_ledger::cli::TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pocket_ledger::cli::CategoryCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(pocket_ledger::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(pocket_ledger::cli::GoalCommands),

    /// Notification commands
    #[command(subcommand, alias = "notifications")]
    Notify(pocket_ledger::cli::NotifyCommands),

    /// Upcoming bill commands
    #[command(subcommand)]
    Bill(pocket_ledger::cli::BillCommands),

    /// Loan, mortgage and savings calculators
    #[command(subcommand)]
    Calc(pocket_ledger::cli::CalcCommands),

    /// Financial report over the whole ledger
    Report {
        /// Print the monthly table as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Export data
    #[command(subcommand)]
    Export(pocket_ledger::cli::ExportCommands),

    /// Replace the ledger with a JSON export
    Import {
        /// Path to the JSON export
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "pocket_ledger=debug" } else { "warn" })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Initialize paths and settings
    let paths = PocketPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing pocket-ledger at: {}", paths.data_dir().display());
            pocket_ledger::storage::init::initialize_storage(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Default categories have been created. Run 'pocket category list' to see them.");
        }
        Some(Commands::Config {
            currency,
            inflation,
            history_limit,
            date_format,
        }) => {
            let changed = currency.is_some()
                || inflation.is_some()
                || history_limit.is_some()
                || date_format.is_some();
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if let Some(inflation) = inflation {
                settings.inflation_percent = inflation;
            }
            if let Some(limit) = history_limit {
                settings.history_limit = limit;
            }
            if let Some(format) = date_format {
                settings.set_date_format(&format)?;
            }
            if changed {
                settings.save(&paths)?;
                println!("Settings saved.");
                println!();
            }

            println!("pocket-ledger Configuration");
            println!("===========================");
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Inflation:         {}%", settings.inflation_percent);
            println!("  History limit:     {}", settings.history_limit);
            println!(
                "  Notifications:     {}",
                if settings.notifications.enabled { "on" } else { "off" }
            );
        }
        Some(Commands::Tx(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, &settings, cmd)?,
        Some(Commands::Notify(cmd)) => handle_notify_command(&storage, &paths, &mut settings, cmd)?,
        Some(Commands::Bill(cmd)) => handle_bill_command(&storage, &settings, cmd)?,
        Some(Commands::Calc(cmd)) => handle_calc_command(&storage, &settings, cmd)?,
        Some(Commands::Report { csv }) => handle_report_command(&storage, &settings, csv)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Import { file }) => handle_import(&storage, &settings, &file)?,
        None => {
            println!("pocket-ledger - personal finance tracking");
            println!();
            println!("Run 'pocket --help' for usage information.");
        }
    }

    Ok(())
}
