//! YAML export
//!
//! The same document as the JSON export, for people to read.

use std::io::Write;
use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::export::json::LedgerExport;
use crate::services::ledger::Ledger;

/// Export the ledger to YAML format
pub fn export_yaml<W: Write>(ledger: &Ledger<'_>, writer: &mut W) -> PocketResult<()> {
    let export = LedgerExport::from_ledger(ledger)?;
    let io_err = |e: std::io::Error| PocketError::Export(e.to_string());

    writeln!(writer, "# pocket-ledger export").map_err(io_err)?;
    writeln!(writer, "# Generated: {}", export.export_date.to_rfc3339()).map_err(io_err)?;
    writeln!(writer, "# Format version: {}", export.version).map_err(io_err)?;
    writeln!(writer, "#").map_err(io_err)?;
    writeln!(writer, "# Read-only copy; import the JSON export to restore.").map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| PocketError::Export(e.to_string()))?;

    info!(transactions = export.transactions.len(), "exported ledger as YAML");
    Ok(())
}
