//! Service layer for pocket-ledger
//!
//! Services borrow the storage layer and add validation, derived fields, and
//! the ledger change channel that keeps budgets, goals and alerts in step
//! with the transactions.

pub mod alerts;
pub mod bill;
pub mod budget;
pub mod goal;
pub mod history;
pub mod ledger;
pub mod notification;
pub mod report;

pub use bill::BillService;
pub use budget::{BudgetEvaluator, BudgetService, BudgetTotals, CreateBudgetInput};
pub use goal::{CreateGoalInput, GoalEvaluator, GoalService, GoalSummary};
pub use history::{CalculationHistory, DEFAULT_RECENT};
pub use ledger::{
    Ledger, LedgerObserver, LedgerSnapshot, LedgerSummary, SavingsBand, TransactionFilter,
};
pub use notification::{EmitDecision, NotificationPolicy, NotificationService, NotificationStats};
pub use report::{FinancialReport, ReportService};
