//! Bill service
//!
//! Upcoming bills are tracked only so the reminder generator can warn before
//! they fall due.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{PocketError, PocketResult};
use crate::models::{Bill, BillId};
use crate::storage::Storage;

/// Service for upcoming bills
pub struct BillService<'a> {
    storage: &'a Storage,
}

impl<'a> BillService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a bill
    pub fn add(
        &self,
        name: &str,
        amount: f64,
        due_date: NaiveDate,
        category: &str,
    ) -> PocketResult<Bill> {
        let bill = Bill::new(name, amount, due_date, category);
        bill.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        self.storage.bills.update(|items| {
            items.push(bill.clone());
            Ok(())
        })?;
        self.storage.bills.save()?;

        info!(id = %bill.id, name = %bill.name, due = %bill.due_date, "added bill");
        Ok(bill)
    }

    /// All bills, soonest due first
    pub fn list(&self) -> PocketResult<Vec<Bill>> {
        let mut bills = self.storage.bills.get_all()?;
        bills.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.name.cmp(&b.name)));
        Ok(bills)
    }

    /// Bills due on or after `today`
    pub fn upcoming(&self, today: NaiveDate) -> PocketResult<Vec<Bill>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|b| b.days_until_due(today) >= 0)
            .collect())
    }

    /// Remove a bill
    pub fn remove(&self, id: BillId) -> PocketResult<Bill> {
        let removed = self.storage.bills.update(|items| {
            let index = items
                .iter()
                .position(|b| b.id == id)
                .ok_or_else(|| PocketError::bill_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })?;
        self.storage.bills.save()?;

        info!(id = %id, "removed bill");
        Ok(removed)
    }
}
