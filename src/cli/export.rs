//! CLI commands for export and import
//!
//! Exports go to a file when `--output` is given and to stdout otherwise;
//! status lines go to stderr so piped output stays clean.

use clap::Subcommand;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::with_ledger;
use crate::config::settings::Settings;
use crate::error::{PocketError, PocketResult};
use crate::export::{export_json, export_transactions_csv, export_yaml, import_json};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Transactions and categories as a JSON document (re-importable)
    Json {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the document on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Transactions as CSV
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Transactions and categories as YAML
    Yaml {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&Path>) -> PocketResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                PocketError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> PocketResult<()> {
    with_ledger(storage, settings, |ledger| {
        let output = match &cmd {
            ExportCommands::Json { output, .. }
            | ExportCommands::Csv { output }
            | ExportCommands::Yaml { output } => output.clone(),
        };
        let mut writer = open_output(output.as_deref())?;

        match cmd {
            ExportCommands::Json { compact, .. } => {
                export_json(ledger, &mut writer, !compact)?;
                writeln!(writer)?;
            }
            ExportCommands::Csv { .. } => export_transactions_csv(ledger, &mut writer)?,
            ExportCommands::Yaml { .. } => export_yaml(ledger, &mut writer)?,
        }
        writer.flush()?;

        if let Some(path) = output {
            eprintln!("Exported to: {}", path.display());
        }
        Ok(())
    })
}

/// Replace the ledger with the contents of a JSON export
///
/// A payload that fails to parse or validate leaves the ledger untouched.
pub fn handle_import(storage: &Storage, settings: &Settings, path: &Path) -> PocketResult<()> {
    let contents = fs::read_to_string(path).map_err(|e| {
        PocketError::Io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    with_ledger(storage, settings, |ledger| {
        let summary = import_json(ledger, &contents)?;
        match summary.categories {
            Some(categories) => println!(
                "Imported {} transactions and {} categories from {}",
                summary.transactions,
                categories,
                path.display()
            ),
            None => println!(
                "Imported {} transactions from {} (categories unchanged)",
                summary.transactions,
                path.display()
            ),
        }
        Ok(())
    })
}
