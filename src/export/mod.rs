//! Export module for pocket-ledger
//!
//! - JSON: the export document, and the only format accepted on import
//! - CSV: transactions for spreadsheets
//! - YAML: human-readable copy of the JSON document

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_transactions_csv;
pub use json::{
    export_json, import_json, parse_import, ImportPayload, ImportSummary, LedgerExport,
    EXPORT_VERSION,
};
pub use yaml::export_yaml;
