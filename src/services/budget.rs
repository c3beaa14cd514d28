//! Budget service
//!
//! Spending caps over a date window. `actual_spent`, `remaining` and `status`
//! are derived from the ledger by [`BudgetEvaluator`] and never set by hand.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::{PocketError, PocketResult};
use crate::models::{
    find_category, Budget, BudgetId, BudgetPeriod, BudgetStatus, BudgetValidationError,
};
use crate::services::ledger::{Ledger, LedgerObserver, LedgerSnapshot};
use crate::storage::Storage;

/// Derives spend-vs-cap state from a ledger snapshot
pub struct BudgetEvaluator;

impl BudgetEvaluator {
    /// Expenses in the budget's categories within `[start_date, end_date)`
    pub fn actual_spent(budget: &Budget, snapshot: &LedgerSnapshot) -> f64 {
        snapshot
            .expenses()
            .filter(|t| budget.tracks(&t.category) && budget.contains(t.date))
            .fold(0.0, |total, t| total + t.amount)
    }

    /// Budget with its derived fields refreshed
    ///
    /// Pure and idempotent: the same snapshot always gives the same result.
    pub fn recompute(budget: &Budget, snapshot: &LedgerSnapshot) -> Budget {
        let actual_spent = Self::actual_spent(budget, snapshot);
        let mut updated = budget.clone();
        updated.actual_spent = actual_spent;
        updated.remaining = budget.amount - actual_spent;
        updated.status = BudgetStatus::from_percentage(updated.usage_percentage());
        updated
    }
}

/// Input for creating a new budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub name: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub categories: Vec<String>,
    pub start_date: NaiveDate,
}

/// Totals across all budgets
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetTotals {
    pub count: usize,
    pub total_amount: f64,
    pub total_spent: f64,
    pub exceeded: usize,
    pub warning: usize,
}

/// Service for budget management
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn snapshot(&self) -> PocketResult<LedgerSnapshot> {
        Ledger::new(self.storage).snapshot()
    }

    /// Create a budget and compute its spend so far
    ///
    /// Category names take the stored spelling when one matches; unknown
    /// names are kept as typed.
    pub fn create(&self, input: CreateBudgetInput) -> PocketResult<Budget> {
        let known = self.storage.categories.get_all()?;
        let categories: Vec<String> = input
            .categories
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(|c| find_category(&known, c).cloned().unwrap_or_else(|| c.to_string()))
            .collect();

        let budget = Budget::new(
            input.name,
            input.amount,
            input.period,
            categories,
            input.start_date,
        );
        budget.validate().map_err(|e| match e {
            BudgetValidationError::NoCategories => PocketError::InvalidInput(e.to_string()),
            other => PocketError::Validation(other.to_string()),
        })?;

        let budget = BudgetEvaluator::recompute(&budget, &self.snapshot()?);

        self.storage.budgets.update(|items| {
            items.push(budget.clone());
            Ok(())
        })?;
        self.storage.budgets.save()?;

        info!(id = %budget.id, name = %budget.name, "created budget");
        Ok(budget)
    }

    /// Recompute every budget against a snapshot and persist the result
    pub fn recompute_all(&self, snapshot: &LedgerSnapshot) -> PocketResult<Vec<Budget>> {
        let budgets = self.storage.budgets.update(|items| {
            for budget in items.iter_mut() {
                *budget = BudgetEvaluator::recompute(budget, snapshot);
            }
            Ok(items.clone())
        })?;
        self.storage.budgets.save()?;

        debug!(count = budgets.len(), "recomputed budgets");
        Ok(budgets)
    }

    /// All budgets, recomputed against the current ledger
    pub fn list(&self) -> PocketResult<Vec<Budget>> {
        self.recompute_all(&self.snapshot()?)
    }

    /// Find a budget by id
    pub fn get(&self, id: BudgetId) -> PocketResult<Option<Budget>> {
        self.storage.budgets.find(|b| b.id == id)
    }

    /// One budget, recomputed
    pub fn show(&self, id: BudgetId) -> PocketResult<Budget> {
        self.list()?
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| PocketError::budget_not_found(id.to_string()))
    }

    /// Delete a budget
    pub fn delete(&self, id: BudgetId) -> PocketResult<Budget> {
        let removed = self.storage.budgets.update(|items| {
            let index = items
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| PocketError::budget_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })?;
        self.storage.budgets.save()?;

        info!(id = %id, "deleted budget");
        Ok(removed)
    }

    /// Aggregate figures for the budget overview
    pub fn totals(&self) -> PocketResult<BudgetTotals> {
        let budgets = self.list()?;
        Ok(BudgetTotals {
            count: budgets.len(),
            total_amount: budgets.iter().map(|b| b.amount).sum(),
            total_spent: budgets.iter().map(|b| b.actual_spent).sum(),
            exceeded: budgets
                .iter()
                .filter(|b| b.status == BudgetStatus::Exceeded)
                .count(),
            warning: budgets
                .iter()
                .filter(|b| b.status == BudgetStatus::Warning)
                .count(),
        })
    }
}

impl LedgerObserver for BudgetService<'_> {
    fn recompute(&self, snapshot: &LedgerSnapshot) -> PocketResult<()> {
        self.recompute_all(snapshot).map(|_| ())
    }
}
