//! JSON export and import
//!
//! The export document is `{transactions, categories, exportDate, version}`.
//! Import checks the raw document shape before anything is deserialized and
//! writes nothing until the whole payload is known to be good.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use tracing::{info, warn};

use crate::error::{PocketError, PocketResult};
use crate::models::Transaction;
use crate::services::ledger::{Ledger, LedgerSnapshot};

/// Version written into every export
pub const EXPORT_VERSION: &str = "2.0.0";

/// The export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExport {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<String>,
    pub export_date: DateTime<Utc>,
    pub version: String,
}

impl LedgerExport {
    pub fn from_snapshot(snapshot: LedgerSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            transactions: snapshot.transactions,
            categories: snapshot.categories,
            export_date: now,
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn from_ledger(ledger: &Ledger<'_>) -> PocketResult<Self> {
        Ok(Self::from_snapshot(ledger.snapshot()?, Utc::now()))
    }
}

/// Validated import contents
#[derive(Debug, Clone, PartialEq)]
pub struct ImportPayload {
    pub transactions: Vec<Transaction>,
    /// `None` keeps the current categories
    pub categories: Option<Vec<String>>,
}

/// What an import changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub transactions: usize,
    pub categories: Option<usize>,
}

/// Write the ledger as a JSON export document
pub fn export_json<W: Write>(ledger: &Ledger<'_>, writer: &mut W, pretty: bool) -> PocketResult<()> {
    let export = LedgerExport::from_ledger(ledger)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| PocketError::Export(e.to_string()))?;

    info!(
        transactions = export.transactions.len(),
        categories = export.categories.len(),
        "exported ledger as JSON"
    );
    Ok(())
}

/// Parse and validate an import document without touching storage
pub fn parse_import(json_str: &str) -> PocketResult<ImportPayload> {
    let document: Value = serde_json::from_str(json_str)
        .map_err(|e| PocketError::InvalidFormat(format!("not valid JSON: {}", e)))?;

    let transactions = match document.get("transactions") {
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(PocketError::InvalidFormat(
                "\"transactions\" must be an array".into(),
            ))
        }
        None => {
            return Err(PocketError::InvalidFormat(
                "missing \"transactions\" array".into(),
            ))
        }
    };

    let transactions = transactions
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let txn: Transaction = serde_json::from_value(item.clone()).map_err(|e| {
                PocketError::InvalidFormat(format!("transaction {}: {}", index, e))
            })?;
            txn.validate()
                .map_err(|e| PocketError::InvalidFormat(format!("transaction {}: {}", index, e)))?;
            Ok(txn)
        })
        .collect::<PocketResult<Vec<_>>>()?;

    let categories = match document.get("categories") {
        Some(Value::Array(items)) => {
            let names = items
                .iter()
                .map(|item| match item {
                    Value::String(name) if !name.trim().is_empty() => Ok(name.trim().to_string()),
                    other => Err(PocketError::InvalidFormat(format!(
                        "invalid category entry: {}",
                        other
                    ))),
                })
                .collect::<PocketResult<Vec<_>>>()?;

            if names.is_empty() {
                warn!("import has an empty category list, keeping current categories");
                None
            } else {
                Some(names)
            }
        }
        _ => None,
    };

    Ok(ImportPayload {
        transactions,
        categories,
    })
}

/// Replace the ledger with the contents of an export document
///
/// Observers subscribed to `ledger` run once the new contents are saved.
pub fn import_json(ledger: &Ledger<'_>, json_str: &str) -> PocketResult<ImportSummary> {
    let payload = parse_import(json_str)?;
    let summary = ImportSummary {
        transactions: payload.transactions.len(),
        categories: payload.categories.as_ref().map(Vec::len),
    };

    ledger.replace_contents(payload.transactions, payload.categories)?;

    info!(
        transactions = summary.transactions,
        categories = ?summary.categories,
        "imported ledger"
    );
    Ok(summary)
}
