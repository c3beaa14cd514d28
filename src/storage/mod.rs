//! Storage layer for pocket-ledger
//!
//! One JSON file per collection under `<base>/data/`, written atomically. All
//! reads and writes are whole-collection; services mutate the in-memory list
//! and then save the collection they touched.

pub mod collection;
pub mod file_io;
pub mod init;

pub use collection::JsonCollection;
pub use file_io::{read_json, read_json_or_else, write_json_atomic};
pub use init::initialize_storage;

use crate::config::paths::PocketPaths;
use crate::error::PocketError;
use crate::models::{
    default_categories, Bill, Budget, CalculationRecord, Goal, Notification, Transaction,
};

/// Main storage coordinator that provides access to all collections
pub struct Storage {
    paths: PocketPaths,
    pub transactions: JsonCollection<Transaction>,
    pub categories: JsonCollection<String>,
    pub budgets: JsonCollection<Budget>,
    pub goals: JsonCollection<Goal>,
    pub notifications: JsonCollection<Notification>,
    pub bills: JsonCollection<Bill>,
    pub history: JsonCollection<CalculationRecord>,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: PocketPaths) -> Result<Self, PocketError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: JsonCollection::new(paths.transactions_file()),
            categories: JsonCollection::new(paths.categories_file()),
            budgets: JsonCollection::new(paths.budgets_file()),
            goals: JsonCollection::new(paths.goals_file()),
            notifications: JsonCollection::new(paths.notifications_file()),
            bills: JsonCollection::new(paths.bills_file()),
            history: JsonCollection::new(paths.history_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &PocketPaths {
        &self.paths
    }

    /// Load all data from disk
    ///
    /// A ledger with no category file starts with the default categories.
    pub fn load_all(&mut self) -> Result<(), PocketError> {
        self.transactions.load()?;
        self.categories.load_or_seed(default_categories)?;
        self.budgets.load()?;
        self.goals.load()?;
        self.notifications.load()?;
        self.bills.load()?;
        self.history.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), PocketError> {
        self.transactions.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        self.goals.save()?;
        self.notifications.save()?;
        self.bills.save()?;
        self.history.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_load_seeds_default_categories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        assert_eq!(storage.categories.get_all().unwrap(), default_categories());
        assert!(storage.transactions.is_empty().unwrap());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths.clone()).unwrap();
        storage.load_all().unwrap();
        storage
            .categories
            .replace_all(vec!["Only".to_string()])
            .unwrap();
        storage.save_all().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.categories.get_all().unwrap(), vec!["Only".to_string()]);
        assert!(temp_dir.path().join("data").join("history.json").exists());
    }
}
