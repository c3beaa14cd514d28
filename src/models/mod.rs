//! Core data models for pocket-ledger
//!
//! Plain data structures for the ledger (transactions, categories), the derived
//! trackers (budgets, goals), notifications, bills and saved calculations.
//! Validation lives next to each model; derived fields are filled in by the
//! services.

pub mod bill;
pub mod budget;
pub mod calculation;
pub mod category;
pub mod goal;
pub mod ids;
pub mod notification;
pub mod transaction;

pub use bill::{Bill, BillValidationError};
pub use budget::{Budget, BudgetPeriod, BudgetStatus, BudgetValidationError};
pub use calculation::{CalculationRecord, CalculationResult};
pub use category::{
    default_categories, find_category, validate_category_name, CategoryValidationError,
    DEFAULT_CATEGORIES,
};
pub use goal::{Goal, GoalStatus, GoalValidationError};
pub use ids::{BillId, BudgetId, CalculationId, GoalId, NotificationId, ParseIdError, TransactionId};
pub use notification::{Notification, NotificationAction, NotificationCandidate, Priority};
pub use transaction::{
    Transaction, TransactionDraft, TransactionKind, TransactionPatch, TransactionValidationError,
};
