//! CSV export of transactions
//!
//! One row per transaction, newest first, spreadsheet-friendly.

use csv::Writer;
use std::io::Write;
use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::services::ledger::{Ledger, TransactionFilter};

const HEADER: [&str; 7] = ["ID", "Date", "Name", "Type", "Category", "Amount", "Created At"];

fn export_error(e: impl std::fmt::Display) -> PocketError {
    PocketError::Export(e.to_string())
}

/// Export all transactions to CSV
pub fn export_transactions_csv<W: Write>(ledger: &Ledger<'_>, writer: &mut W) -> PocketResult<()> {
    let transactions = ledger.query(&TransactionFilter::new())?;

    let mut csv_writer = Writer::from_writer(writer);
    csv_writer.write_record(HEADER).map_err(export_error)?;

    for txn in &transactions {
        csv_writer
            .write_record([
                txn.id.to_string(),
                txn.date.to_string(),
                txn.name.clone(),
                txn.kind.to_string(),
                txn.category.clone(),
                format!("{:.2}", txn.amount),
                txn.created_at.to_rfc3339(),
            ])
            .map_err(export_error)?;
    }
    csv_writer.flush().map_err(export_error)?;

    info!(count = transactions.len(), "exported transactions as CSV");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PocketPaths;
    use crate::models::{TransactionDraft, TransactionKind};
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_export_transactions_csv() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);
        ledger
            .add(TransactionDraft {
                name: "Books, used".into(),
                amount: 42.0,
                date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                kind: TransactionKind::Expense,
                category: "Education".into(),
            })
            .unwrap();
        ledger
            .add(TransactionDraft {
                name: "Pay".into(),
                amount: 2500.0,
                date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
                kind: TransactionKind::Income,
                category: "Salary".into(),
            })
            .unwrap();

        let mut out = Vec::new();
        export_transactions_csv(&ledger, &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        assert_eq!(reader.headers().unwrap().len(), 7);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "2025-01-31");
        assert_eq!(&rows[0][3], "income");
        // comma in the name survives quoting
        assert_eq!(&rows[1][2], "Books, used");
        assert_eq!(&rows[1][5], "42.00");
    }
}
