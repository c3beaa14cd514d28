//! Calculation history
//!
//! Finished calculator results, newest first, trimmed to a configured limit.

use tracing::{debug, info};

use crate::error::PocketResult;
use crate::models::{CalculationRecord, CalculationResult};
use crate::storage::Storage;

/// Entries shown when no explicit count is asked for
pub const DEFAULT_RECENT: usize = 10;

/// Saved calculator results
pub struct CalculationHistory<'a> {
    storage: &'a Storage,
    limit: usize,
}

impl<'a> CalculationHistory<'a> {
    /// `limit` is the most entries kept; older ones are dropped on record
    pub fn new(storage: &'a Storage, limit: usize) -> Self {
        Self { storage, limit }
    }

    /// Save a result at the front of the history
    pub fn record(&self, result: CalculationResult) -> PocketResult<CalculationRecord> {
        let record = CalculationRecord::new(result);
        let limit = self.limit;

        let dropped = self.storage.history.update(|items| {
            items.insert(0, record.clone());
            let excess = items.len().saturating_sub(limit);
            items.truncate(limit);
            Ok(excess)
        })?;
        self.storage.history.save()?;

        debug!(id = %record.id, kind = record.result.kind(), dropped, "recorded calculation");
        Ok(record)
    }

    /// Up to `count` most recent entries
    pub fn recent(&self, count: usize) -> PocketResult<Vec<CalculationRecord>> {
        let mut items = self.storage.history.get_all()?;
        items.truncate(count);
        Ok(items)
    }

    /// Remove all entries, returning how many there were
    pub fn clear(&self) -> PocketResult<usize> {
        let count = self.storage.history.update(|items| {
            let count = items.len();
            items.clear();
            Ok(count)
        })?;
        self.storage.history.save()?;

        info!(count, "cleared calculation history");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute_loan, project, FeeRates};
    use crate::config::paths::PocketPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn savings(deposit: f64) -> CalculationResult {
        CalculationResult::Savings(project(0.0, deposit, 1, 5.0, 3.0).unwrap())
    }

    #[test]
    fn test_newest_first_and_capped() {
        let (_temp_dir, storage) = create_test_storage();
        let history = CalculationHistory::new(&storage, 3);

        for deposit in [100.0, 200.0, 300.0, 400.0] {
            history.record(savings(deposit)).unwrap();
        }

        let recent = history.recent(DEFAULT_RECENT).unwrap();
        let deposits: Vec<f64> = recent
            .iter()
            .map(|r| match &r.result {
                CalculationResult::Savings(p) => p.monthly_deposit,
                other => panic!("unexpected {}", other.kind()),
            })
            .collect();
        assert_eq!(deposits, vec![400.0, 300.0, 200.0]);
        assert_eq!(history.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn test_persists_and_clears() {
        let (temp_dir, storage) = create_test_storage();
        let history = CalculationHistory::new(&storage, 50);
        let loan = compute_loan(50_000.0, 36, 8.0, &FeeRates::default(), false).unwrap();
        history.record(CalculationResult::Loan(loan)).unwrap();

        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        let entries = CalculationHistory::new(&reopened, 50).recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].result.kind(), "loan");

        assert_eq!(history.clear().unwrap(), 1);
        assert!(history.recent(10).unwrap().is_empty());
    }
}
