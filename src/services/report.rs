//! Financial report
//!
//! A point-in-time analysis of the whole ledger: totals, per-category
//! breakdown, month-over-month trends, and a short list of insights and
//! recommendations derived from those figures.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use crate::calc::AdviceLevel;
use crate::error::{PocketError, PocketResult};
use crate::models::{Transaction, TransactionKind};
use crate::services::ledger::{Ledger, LedgerSnapshot};
use crate::storage::Storage;

/// Savings rate below which the report raises a warning
const LOW_SAVINGS_RATE: f64 = 10.0;

/// Savings rate the recommendations aim for
const TARGET_SAVINGS_RATE: f64 = 20.0;

/// Overall figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub savings_rate: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expense: f64,
    pub largest_income: Option<Transaction>,
    pub largest_expense: Option<Transaction>,
    pub transaction_count: usize,
}

/// One category's share of a kind's total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

/// Categories for each kind, largest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAnalysis {
    pub income: Vec<CategoryShare>,
    pub expense: Vec<CategoryShare>,
}

impl CategoryAnalysis {
    pub fn top_income(&self) -> Option<&CategoryShare> {
        self.income.first()
    }

    pub fn top_expense(&self) -> Option<&CategoryShare> {
        self.expense.first()
    }
}

/// Totals for one calendar month
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expense: f64,
    pub count: usize,
}

impl MonthlyTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Change between the first and last month on record, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthRate {
    pub income: Option<f64>,
    pub expense: Option<f64>,
}

/// Month-by-month view keyed `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub monthly: BTreeMap<String, MonthlyTotals>,
    pub growth_rate: GrowthRate,
    pub best_month: Option<String>,
    pub worst_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub level: AdviceLevel,
    pub title: String,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub action: String,
    pub details: String,
}

/// Full report over the ledger
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub categories: CategoryAnalysis,
    pub trends: TrendAnalysis,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}

fn month_key(txn: &Transaction) -> String {
    format!("{}-{:02}", txn.date.year(), txn.date.month())
}

fn largest(snapshot: &LedgerSnapshot, kind: TransactionKind) -> Option<Transaction> {
    snapshot
        .transactions
        .iter()
        .filter(|t| t.kind == kind)
        .fold(None, |best: Option<&Transaction>, t| match best {
            Some(b) if b.amount >= t.amount => Some(b),
            _ => Some(t),
        })
        .cloned()
}

fn category_shares(snapshot: &LedgerSnapshot, kind: TransactionKind) -> Vec<CategoryShare> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for txn in snapshot.transactions.iter().filter(|t| t.kind == kind) {
        *totals.entry(txn.category.as_str()).or_default() += txn.amount;
    }

    let total: f64 = totals.values().sum();
    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
        })
        .collect();

    // ties broken by name so output is stable
    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    shares
}

fn growth(first: f64, last: f64) -> Option<f64> {
    if first == 0.0 {
        None
    } else {
        Some((last - first) / first * 100.0)
    }
}

impl TrendAnalysis {
    fn from_snapshot(snapshot: &LedgerSnapshot) -> Self {
        let mut monthly: BTreeMap<String, MonthlyTotals> = BTreeMap::new();
        for txn in &snapshot.transactions {
            let entry = monthly.entry(month_key(txn)).or_default();
            match txn.kind {
                TransactionKind::Income => entry.income += txn.amount,
                TransactionKind::Expense => entry.expense += txn.amount,
            }
            entry.count += 1;
        }

        let growth_rate = match (monthly.values().next(), monthly.values().next_back()) {
            (Some(first), Some(last)) if monthly.len() >= 2 => GrowthRate {
                income: growth(first.income, last.income),
                expense: growth(first.expense, last.expense),
            },
            _ => GrowthRate {
                income: None,
                expense: None,
            },
        };

        // earliest month wins ties
        let mut best: Option<(&String, f64)> = None;
        let mut worst: Option<(&String, f64)> = None;
        for (month, totals) in &monthly {
            let net = totals.net();
            if best.map_or(true, |(_, b)| net > b) {
                best = Some((month, net));
            }
            if worst.map_or(true, |(_, w)| net < w) {
                worst = Some((month, net));
            }
        }

        Self {
            growth_rate,
            best_month: best.map(|(m, _)| m.clone()),
            worst_month: worst.map(|(m, _)| m.clone()),
            monthly,
        }
    }
}

impl FinancialReport {
    /// Build a report, or `None` when the ledger has no transactions
    pub fn generate(snapshot: &LedgerSnapshot, now: DateTime<Utc>) -> Option<Self> {
        if snapshot.transactions.is_empty() {
            return None;
        }

        let trends = TrendAnalysis::from_snapshot(snapshot);
        let months = trends.monthly.len().max(1) as f64;

        let total_income = snapshot.total(TransactionKind::Income);
        let total_expense = snapshot.total(TransactionKind::Expense);
        let balance = total_income - total_expense;
        let savings_rate = if total_income > 0.0 {
            balance / total_income * 100.0
        } else {
            0.0
        };

        let summary = ReportSummary {
            total_income,
            total_expense,
            balance,
            savings_rate,
            average_monthly_income: total_income / months,
            average_monthly_expense: total_expense / months,
            largest_income: largest(snapshot, TransactionKind::Income),
            largest_expense: largest(snapshot, TransactionKind::Expense),
            transaction_count: snapshot.transactions.len(),
        };

        let categories = CategoryAnalysis {
            income: category_shares(snapshot, TransactionKind::Income),
            expense: category_shares(snapshot, TransactionKind::Expense),
        };

        let insights = Self::insights(&summary, &categories, &trends);
        let recommendations = Self::recommendations(&summary);

        Some(Self {
            generated_at: now,
            summary,
            categories,
            trends,
            insights,
            recommendations,
        })
    }

    fn insights(
        summary: &ReportSummary,
        categories: &CategoryAnalysis,
        trends: &TrendAnalysis,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        if summary.savings_rate < LOW_SAVINGS_RATE {
            insights.push(Insight {
                level: AdviceLevel::Warning,
                title: "Low savings rate".into(),
                message: format!(
                    "Your savings rate ({:.1}%) is below the recommended {:.0}%.",
                    summary.savings_rate, TARGET_SAVINGS_RATE
                ),
                suggestion: "Consider cutting non-essential expenses.".into(),
            });
        }

        if let Some(top) = categories.top_expense() {
            insights.push(Insight {
                level: AdviceLevel::Info,
                title: "Largest expense".into(),
                message: format!(
                    "\"{}\" accounts for {:.1}% of your expenses.",
                    top.category, top.percentage
                ),
                suggestion: "Review spending in this category to save more.".into(),
            });
        }

        if trends.growth_rate.income.is_some_and(|g| g < 0.0) {
            insights.push(Insight {
                level: AdviceLevel::Danger,
                title: "Falling income".into(),
                message: "Income has dropped over the recorded period.".into(),
                suggestion: "Look for additional sources of income.".into(),
            });
        }

        insights
    }

    fn recommendations(summary: &ReportSummary) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if summary.balance < 0.0 {
            recommendations.push(Recommendation {
                priority: RecommendationPriority::High,
                action: "Reduce expenses".into(),
                details: "Focus on cutting non-essential spending to bring the balance back \
                          above zero."
                    .into(),
            });
        }

        if summary.savings_rate < TARGET_SAVINGS_RATE {
            recommendations.push(Recommendation {
                priority: RecommendationPriority::Medium,
                action: "Increase savings".into(),
                details: format!(
                    "Try to set aside at least {:.0}% of your monthly income.",
                    TARGET_SAVINGS_RATE
                ),
            });
        }

        recommendations
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        let money = |v: f64| format!("{}{:.2}", currency, v);

        output.push_str(&format!(
            "Financial Report ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        let s = &self.summary;
        output.push_str(&format!("{:<28} {:>16}\n", "Total income:", money(s.total_income)));
        output.push_str(&format!("{:<28} {:>16}\n", "Total expenses:", money(s.total_expense)));
        output.push_str(&format!("{:<28} {:>16}\n", "Balance:", money(s.balance)));
        output.push_str(&format!("{:<28} {:>15.1}%\n", "Savings rate:", s.savings_rate));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Avg monthly income:",
            money(s.average_monthly_income)
        ));
        output.push_str(&format!(
            "{:<28} {:>16}\n",
            "Avg monthly expenses:",
            money(s.average_monthly_expense)
        ));
        output.push_str(&format!("{:<28} {:>16}\n", "Transactions:", s.transaction_count));

        for (label, shares) in [
            ("INCOME BY CATEGORY", &self.categories.income),
            ("EXPENSES BY CATEGORY", &self.categories.expense),
        ] {
            if shares.is_empty() {
                continue;
            }
            output.push_str(&format!("\n{}\n", label));
            for share in shares {
                output.push_str(&format!(
                    "  {:<26} {:>16} {:>7.1}%\n",
                    share.category,
                    money(share.amount),
                    share.percentage
                ));
            }
        }

        output.push_str("\nMONTHLY TRENDS\n");
        output.push_str(&format!(
            "  {:<10} {:>14} {:>14} {:>14} {:>6}\n",
            "Month", "Income", "Expenses", "Net", "Count"
        ));
        for (month, totals) in &self.trends.monthly {
            output.push_str(&format!(
                "  {:<10} {:>14} {:>14} {:>14} {:>6}\n",
                month,
                money(totals.income),
                money(totals.expense),
                money(totals.net()),
                totals.count
            ));
        }
        if let (Some(best), Some(worst)) = (&self.trends.best_month, &self.trends.worst_month) {
            output.push_str(&format!("  Best month: {}  Worst month: {}\n", best, worst));
        }

        if !self.insights.is_empty() {
            output.push_str("\nINSIGHTS\n");
            for insight in &self.insights {
                output.push_str(&format!(
                    "  [{}] {}: {}\n        {}\n",
                    insight.level, insight.title, insight.message, insight.suggestion
                ));
            }
        }

        if !self.recommendations.is_empty() {
            output.push_str("\nRECOMMENDATIONS\n");
            for rec in &self.recommendations {
                let priority = match rec.priority {
                    RecommendationPriority::High => "high",
                    RecommendationPriority::Medium => "medium",
                };
                output.push_str(&format!("  ({}) {}: {}\n", priority, rec.action, rec.details));
            }
        }

        output
    }

    /// Export the monthly trends to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> PocketResult<()> {
        writeln!(writer, "Month,Income,Expense,Net,Count")
            .map_err(|e| PocketError::Export(e.to_string()))?;

        for (month, totals) in &self.trends.monthly {
            writeln!(
                writer,
                "{},{:.2},{:.2},{:.2},{}",
                month,
                totals.income,
                totals.expense,
                totals.net(),
                totals.count
            )
            .map_err(|e| PocketError::Export(e.to_string()))?;
        }

        Ok(())
    }
}

/// Generates reports against stored data
pub struct ReportService<'a> {
    storage: &'a Storage,
}

impl<'a> ReportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn generate(&self, now: DateTime<Utc>) -> PocketResult<Option<FinancialReport>> {
        let snapshot = Ledger::new(self.storage).snapshot()?;
        Ok(FinancialReport::generate(&snapshot, now))
    }
}
