//! Ledger service
//!
//! The authoritative transaction list and category set. Every successful
//! mutation persists the affected collection and then hands a fresh snapshot to
//! each subscribed observer, in subscription order.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PocketError, PocketResult};
use crate::models::{
    find_category, validate_category_name, CategoryValidationError, Transaction,
    TransactionDraft, TransactionId, TransactionKind, TransactionPatch,
};
use crate::storage::Storage;

/// Immutable copy of the ledger handed to evaluators
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<String>,
}

impl LedgerSnapshot {
    /// Sum of amounts of one kind
    pub fn total(&self, kind: TransactionKind) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum()
    }

    pub fn expenses(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.is_expense())
    }
}

/// Something that keeps derived state in step with the ledger
pub trait LedgerObserver {
    /// Recompute derived state from a snapshot
    fn recompute(&self, snapshot: &LedgerSnapshot) -> PocketResult<()>;

    /// Called after every successful ledger mutation
    fn on_ledger_changed(&self, snapshot: &LedgerSnapshot) -> PocketResult<()> {
        self.recompute(snapshot)
    }
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Exact category name, case-insensitive
    pub category: Option<String>,
    /// Inclusive start date
    pub start_date: Option<NaiveDate>,
    /// Inclusive end date
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|kind| txn.kind != kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if !txn.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if let Some(term) = &self.search {
            if !txn.matches_search(term) {
                return false;
            }
        }
        true
    }
}

/// How healthy the savings rate looks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsBand {
    Excellent,
    Good,
    Low,
    Negative,
}

impl SavingsBand {
    pub fn from_rate(rate: f64) -> Self {
        if rate >= 20.0 {
            Self::Excellent
        } else if rate >= 10.0 {
            Self::Good
        } else if rate >= 0.0 {
            Self::Low
        } else {
            Self::Negative
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! You are saving more than 20% of your income",
            Self::Good => "Good. Try to push your savings rate above 20%",
            Self::Low => "Your savings rate is low. Look for expenses to cut",
            Self::Negative => "You are spending more than you earn",
        }
    }
}

/// Dashboard totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub count: usize,
    pub savings_rate: f64,
    pub savings_band: SavingsBand,
    pub this_month_income: f64,
    pub this_month_expense: f64,
}

/// Service owning the transaction list and categories
pub struct Ledger<'a> {
    storage: &'a Storage,
    observers: Vec<&'a dyn LedgerObserver>,
}

impl<'a> Ledger<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            observers: Vec::new(),
        }
    }

    /// Register an observer; observers run in the order they subscribe
    pub fn subscribe(mut self, observer: &'a dyn LedgerObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// Fresh copy of transactions and categories
    pub fn snapshot(&self) -> PocketResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            transactions: self.storage.transactions.get_all()?,
            categories: self.storage.categories.get_all()?,
        })
    }

    fn notify_observers(&self) -> PocketResult<()> {
        if self.observers.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        for observer in &self.observers {
            observer.on_ledger_changed(&snapshot)?;
        }
        Ok(())
    }

    /// Run every observer's recompute without a mutation
    pub fn refresh(&self) -> PocketResult<()> {
        let snapshot = self.snapshot()?;
        for observer in &self.observers {
            observer.recompute(&snapshot)?;
        }
        Ok(())
    }

    /// Resolve a category name to its stored spelling
    fn canonical_category(&self, name: &str) -> PocketResult<String> {
        let categories = self.storage.categories.get_all()?;
        find_category(&categories, name).cloned().ok_or_else(|| {
            PocketError::Validation(format!("Category '{}' does not exist", name.trim()))
        })
    }

    /// Add a transaction
    pub fn add(&self, draft: TransactionDraft) -> PocketResult<Transaction> {
        let mut txn = Transaction::from_draft(draft);
        txn.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;
        txn.category = self.canonical_category(&txn.category)?;

        self.storage.transactions.update(|items| {
            items.insert(0, txn.clone());
            Ok(())
        })?;
        self.storage.transactions.save()?;

        info!(id = %txn.id, amount = txn.amount, kind = %txn.kind, "added transaction");
        self.notify_observers()?;
        Ok(txn)
    }

    /// Get a transaction by id
    pub fn get(&self, id: TransactionId) -> PocketResult<Option<Transaction>> {
        self.storage.transactions.find(|t| t.id == id)
    }

    /// Edit a transaction
    pub fn update(&self, id: TransactionId, patch: TransactionPatch) -> PocketResult<Transaction> {
        let category = match &patch.category {
            Some(name) => Some(self.canonical_category(name)?),
            None => None,
        };

        let updated = self.storage.transactions.update(|items| {
            let txn = items
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))?;

            let mut candidate = txn.clone();
            candidate.apply(patch);
            if let Some(category) = category {
                candidate.category = category;
            }
            candidate
                .validate()
                .map_err(|e| PocketError::Validation(e.to_string()))?;

            *txn = candidate.clone();
            Ok(candidate)
        })?;
        self.storage.transactions.save()?;

        info!(id = %id, "updated transaction");
        self.notify_observers()?;
        Ok(updated)
    }

    /// Delete a transaction
    pub fn remove(&self, id: TransactionId) -> PocketResult<Transaction> {
        let removed = self.storage.transactions.update(|items| {
            let index = items
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| PocketError::transaction_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })?;
        self.storage.transactions.save()?;

        info!(id = %id, "removed transaction");
        self.notify_observers()?;
        Ok(removed)
    }

    /// Transactions matching a filter, newest first
    ///
    /// Each call reads a fresh snapshot.
    pub fn query(&self, filter: &TransactionFilter) -> PocketResult<Vec<Transaction>> {
        let mut matching: Vec<Transaction> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        matching.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }

        debug!(count = matching.len(), "queried transactions");
        Ok(matching)
    }

    /// Sum of amounts of one kind
    pub fn totals(&self, kind: TransactionKind) -> PocketResult<f64> {
        Ok(self.snapshot()?.total(kind))
    }

    /// Dashboard totals, with "this month" measured against `today`
    pub fn summary(&self, today: NaiveDate) -> PocketResult<LedgerSummary> {
        let snapshot = self.snapshot()?;
        let income = snapshot.total(TransactionKind::Income);
        let expense = snapshot.total(TransactionKind::Expense);
        let savings_rate = if income > 0.0 {
            (income - expense) / income * 100.0
        } else {
            0.0
        };

        let in_month = |t: &&Transaction| t.date.year() == today.year() && t.date.month() == today.month();
        let this_month_income = snapshot
            .transactions
            .iter()
            .filter(in_month)
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let this_month_expense = snapshot
            .transactions
            .iter()
            .filter(in_month)
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();

        Ok(LedgerSummary {
            income,
            expense,
            balance: income - expense,
            count: snapshot.transactions.len(),
            savings_rate,
            savings_band: SavingsBand::from_rate(savings_rate),
            this_month_income,
            this_month_expense,
        })
    }

    /// Category names in display order
    pub fn categories(&self) -> PocketResult<Vec<String>> {
        self.storage.categories.get_all()
    }

    /// Append a category
    pub fn add_category(&self, name: &str) -> PocketResult<String> {
        let name = name.trim().to_string();
        self.storage.categories.update(|items| {
            validate_category_name(items, &name).map_err(|e| match e {
                CategoryValidationError::Duplicate(existing) => {
                    PocketError::Duplicate {
                        entity_type: "Category",
                        identifier: existing,
                    }
                }
                other => PocketError::Validation(other.to_string()),
            })?;
            items.push(name.clone());
            Ok(())
        })?;
        self.storage.categories.save()?;

        info!(category = %name, "added category");
        self.notify_observers()?;
        Ok(name)
    }

    /// Remove a category
    ///
    /// Transactions and budgets that name it keep the dangling reference.
    pub fn remove_category(&self, name: &str) -> PocketResult<String> {
        let removed = self.storage.categories.update(|items| {
            let index = items
                .iter()
                .position(|c| c.eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| PocketError::category_not_found(name.trim()))?;
            if items.len() <= 1 {
                return Err(PocketError::Validation(
                    "Cannot delete the last remaining category".into(),
                ));
            }
            Ok(items.remove(index))
        })?;
        self.storage.categories.save()?;

        info!(category = %removed, "removed category");
        self.notify_observers()?;
        Ok(removed)
    }

    /// Replace the whole ledger (used by import)
    ///
    /// `categories` of `None` keeps the current category set.
    pub fn replace_contents(
        &self,
        transactions: Vec<Transaction>,
        categories: Option<Vec<String>>,
    ) -> PocketResult<()> {
        if let Some(categories) = &categories {
            if categories.is_empty() {
                return Err(PocketError::Validation(
                    "At least one category is required".into(),
                ));
            }
        }

        let count = transactions.len();
        self.storage.transactions.replace_all(transactions)?;
        self.storage.transactions.save()?;
        if let Some(categories) = categories {
            self.storage.categories.replace_all(categories)?;
            self.storage.categories.save()?;
        }

        info!(count, "replaced ledger contents");
        self.notify_observers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PocketPaths;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(name: &str, amount: f64, kind: TransactionKind, category: &str, on: NaiveDate) -> TransactionDraft {
        TransactionDraft {
            name: name.into(),
            amount,
            date: on,
            kind,
            category: category.into(),
        }
    }

    struct Recorder<'l> {
        label: &'static str,
        log: &'l RefCell<Vec<(&'static str, usize)>>,
    }

    impl LedgerObserver for Recorder<'_> {
        fn recompute(&self, snapshot: &LedgerSnapshot) -> PocketResult<()> {
            self.log
                .borrow_mut()
                .push((self.label, snapshot.transactions.len()));
            Ok(())
        }
    }

    #[test]
    fn test_add_and_totals() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);

        ledger
            .add(draft("Paycheck", 3000.0, TransactionKind::Income, "Salary", date(2025, 1, 1)))
            .unwrap();
        ledger
            .add(draft("Groceries", 120.5, TransactionKind::Expense, "food & drink", date(2025, 1, 2)))
            .unwrap();

        assert_eq!(ledger.totals(TransactionKind::Income).unwrap(), 3000.0);
        assert_eq!(ledger.totals(TransactionKind::Expense).unwrap(), 120.5);

        // Category spelling is normalized to the stored name
        let all = ledger.query(&TransactionFilter::new()).unwrap();
        assert_eq!(all[0].category, "Food & Drink");
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);

        let err = ledger
            .add(draft("   ", 10.0, TransactionKind::Expense, "Home", date(2025, 1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = ledger
            .add(draft("Rent", 0.0, TransactionKind::Expense, "Home", date(2025, 1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = ledger
            .add(draft("Rent", f64::NAN, TransactionKind::Expense, "Home", date(2025, 1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        let err = ledger
            .add(draft("Rent", 10.0, TransactionKind::Expense, "Nope", date(2025, 1, 1)))
            .unwrap_err();
        assert!(err.is_validation());

        assert!(storage.transactions.is_empty().unwrap());
    }

    #[test]
    fn test_update_and_remove() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);
        let txn = ledger
            .add(draft("Bus", 2.5, TransactionKind::Expense, "Transport", date(2025, 2, 1)))
            .unwrap();

        let updated = ledger
            .update(
                txn.id,
                TransactionPatch {
                    amount: Some(3.0),
                    name: Some("  Bus pass ".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, 3.0);
        assert_eq!(updated.name, "Bus pass");
        assert_eq!(updated.id, txn.id);

        let err = ledger
            .update(
                txn.id,
                TransactionPatch {
                    amount: Some(-1.0),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(ledger.get(txn.id).unwrap().unwrap().amount, 3.0);

        ledger.remove(txn.id).unwrap();
        assert!(ledger.remove(txn.id).unwrap_err().is_not_found());
        assert!(ledger
            .update(TransactionId::from_raw(1), TransactionPatch::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_query_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);
        ledger
            .add(draft("Salary", 4000.0, TransactionKind::Income, "Salary", date(2025, 3, 1)))
            .unwrap();
        ledger
            .add(draft("Cinema", 15.0, TransactionKind::Expense, "Entertainment", date(2025, 3, 5)))
            .unwrap();
        ledger
            .add(draft("Dinner", 45.0, TransactionKind::Expense, "Food & Drink", date(2025, 4, 2)))
            .unwrap();

        let expenses = ledger
            .query(&TransactionFilter::new().kind(TransactionKind::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].name, "Dinner");

        let march = ledger
            .query(&TransactionFilter::new().date_range(date(2025, 3, 1), date(2025, 3, 31)))
            .unwrap();
        assert_eq!(march.len(), 2);

        let search = ledger.query(&TransactionFilter::new().search("cine")).unwrap();
        assert_eq!(search.len(), 1);

        let by_amount = ledger.query(&TransactionFilter::new().search("4000")).unwrap();
        assert_eq!(by_amount.len(), 1);

        let limited = ledger.query(&TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited.len(), 1);

        let by_category = ledger
            .query(&TransactionFilter::new().category("entertainment"))
            .unwrap();
        assert_eq!(by_category.len(), 1);
    }

    #[test]
    fn test_categories_floor_of_one() {
        let (_temp_dir, storage) = create_test_storage();
        storage.categories.replace_all(vec!["A".into(), "B".into()]).unwrap();
        let ledger = Ledger::new(&storage);

        assert!(matches!(
            ledger.add_category("a").unwrap_err(),
            PocketError::Duplicate { .. }
        ));
        assert!(ledger.add_category("  ").unwrap_err().is_validation());

        ledger.remove_category("A").unwrap();
        assert!(ledger.remove_category("B").unwrap_err().is_validation());
        assert!(ledger.remove_category("Z").unwrap_err().is_not_found());
        assert_eq!(ledger.categories().unwrap(), vec!["B".to_string()]);
    }

    #[test]
    fn test_remove_category_leaves_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);
        ledger
            .add(draft("Gym", 30.0, TransactionKind::Expense, "Health", date(2025, 1, 1)))
            .unwrap();
        ledger.remove_category("Health").unwrap();

        let all = ledger.query(&TransactionFilter::new()).unwrap();
        assert_eq!(all[0].category, "Health");
    }

    #[test]
    fn test_observers_run_in_order() {
        let (_temp_dir, storage) = create_test_storage();
        let log = RefCell::new(Vec::new());
        let first = Recorder { label: "first", log: &log };
        let second = Recorder { label: "second", log: &log };

        let ledger = Ledger::new(&storage).subscribe(&first).subscribe(&second);
        ledger
            .add(draft("Book", 20.0, TransactionKind::Expense, "Education", date(2025, 1, 1)))
            .unwrap();
        // Failed mutations do not notify
        assert!(ledger.remove(TransactionId::from_raw(42)).is_err());

        assert_eq!(log.into_inner(), vec![("first", 1), ("second", 1)]);
    }

    #[test]
    fn test_summary() {
        let (_temp_dir, storage) = create_test_storage();
        let ledger = Ledger::new(&storage);
        ledger
            .add(draft("Pay", 1000.0, TransactionKind::Income, "Salary", date(2025, 5, 1)))
            .unwrap();
        ledger
            .add(draft("Rent", 850.0, TransactionKind::Expense, "Home", date(2025, 5, 2)))
            .unwrap();
        ledger
            .add(draft("Old", 50.0, TransactionKind::Expense, "Home", date(2025, 4, 2)))
            .unwrap();

        let summary = ledger.summary(date(2025, 5, 20)).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.balance, 100.0);
        assert!((summary.savings_rate - 10.0).abs() < 1e-9);
        assert_eq!(summary.savings_band, SavingsBand::Good);
        assert_eq!(summary.this_month_expense, 850.0);
    }

    #[test]
    fn test_summary_empty_ledger() {
        let (_temp_dir, storage) = create_test_storage();
        let summary = Ledger::new(&storage).summary(date(2025, 1, 1)).unwrap();
        assert_eq!(summary.savings_rate, 0.0);
        assert_eq!(summary.savings_band, SavingsBand::Low);
    }
}
