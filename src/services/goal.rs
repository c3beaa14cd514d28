//! Goal service
//!
//! Savings goals move only through explicit deposits and withdrawals. Progress
//! and status are rederived after every change and whenever goals are listed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PocketError, PocketResult};
use crate::models::{Goal, GoalId, GoalStatus};
use crate::services::ledger::{LedgerObserver, LedgerSnapshot};
use crate::storage::Storage;

/// Derives goal progress and urgency
pub struct GoalEvaluator;

impl GoalEvaluator {
    /// Goal with progress and status refreshed for `now`
    pub fn recompute(goal: &Goal, now: DateTime<Utc>) -> Goal {
        let mut updated = goal.clone();
        updated.progress = if goal.target_amount > 0.0 {
            goal.current_amount / goal.target_amount * 100.0
        } else {
            0.0
        };
        updated.status = GoalStatus::derive(updated.progress, goal.days_left(now));
        updated
    }
}

/// Input for creating a new goal
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub title: String,
    pub target_amount: f64,
    pub deadline: NaiveDate,
    pub category: String,
    pub initial_amount: f64,
}

/// Overview across all goals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSummary {
    pub total: usize,
    pub achieved: usize,
    pub in_progress: usize,
    pub total_target: f64,
    pub total_saved: f64,
    pub average_progress: f64,
}

/// Service for goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a goal
    pub fn create(&self, input: CreateGoalInput, now: DateTime<Utc>) -> PocketResult<Goal> {
        let goal = Goal::new(
            input.title,
            input.target_amount,
            input.deadline,
            input.category,
            input.initial_amount,
        );
        goal.validate()
            .map_err(|e| PocketError::Validation(e.to_string()))?;

        let goal = GoalEvaluator::recompute(&goal, now);
        self.storage.goals.update(|items| {
            items.push(goal.clone());
            Ok(())
        })?;
        self.storage.goals.save()?;

        info!(id = %goal.id, title = %goal.title, "created goal");
        Ok(goal)
    }

    /// Deposit (positive) or withdraw (negative) and rederive status
    ///
    /// A withdrawal may not take the balance below zero.
    pub fn update_progress(
        &self,
        id: GoalId,
        delta: f64,
        now: DateTime<Utc>,
    ) -> PocketResult<Goal> {
        if !delta.is_finite() {
            return Err(PocketError::Validation(format!(
                "Amount must be a number, got {}",
                delta
            )));
        }

        let updated = self.storage.goals.update(|items| {
            let goal = items
                .iter_mut()
                .find(|g| g.id == id)
                .ok_or_else(|| PocketError::goal_not_found(id.to_string()))?;

            let mut candidate = goal.clone();
            candidate.current_amount += delta;
            candidate
                .validate()
                .map_err(|e| PocketError::Validation(e.to_string()))?;

            *goal = GoalEvaluator::recompute(&candidate, now);
            Ok(goal.clone())
        })?;
        self.storage.goals.save()?;

        info!(id = %id, delta, status = %updated.status, "updated goal progress");
        Ok(updated)
    }

    /// Recompute and persist every goal
    pub fn recompute_all(&self, now: DateTime<Utc>) -> PocketResult<Vec<Goal>> {
        let goals = self.storage.goals.update(|items| {
            for goal in items.iter_mut() {
                *goal = GoalEvaluator::recompute(goal, now);
            }
            Ok(items.clone())
        })?;
        self.storage.goals.save()?;

        debug!(count = goals.len(), "recomputed goals");
        Ok(goals)
    }

    /// Goals sorted by urgency, then by deadline
    pub fn list(&self, now: DateTime<Utc>) -> PocketResult<Vec<Goal>> {
        let mut goals = self.recompute_all(now)?;
        goals.sort_by(|a, b| {
            a.status
                .sort_priority()
                .cmp(&b.status.sort_priority())
                .then(a.deadline.cmp(&b.deadline))
        });
        Ok(goals)
    }

    pub fn get(&self, id: GoalId) -> PocketResult<Option<Goal>> {
        self.storage.goals.find(|g| g.id == id)
    }

    /// Delete a goal
    pub fn delete(&self, id: GoalId) -> PocketResult<Goal> {
        let removed = self.storage.goals.update(|items| {
            let index = items
                .iter()
                .position(|g| g.id == id)
                .ok_or_else(|| PocketError::goal_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })?;
        self.storage.goals.save()?;

        info!(id = %id, "deleted goal");
        Ok(removed)
    }

    pub fn summary(&self, now: DateTime<Utc>) -> PocketResult<GoalSummary> {
        let goals = self.recompute_all(now)?;
        let total = goals.len();
        let achieved = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Achieved)
            .count();
        let in_progress = goals.iter().filter(|g| g.status.is_open()).count();

        let average_progress = if total > 0 {
            goals.iter().map(|g| g.progress.min(100.0)).sum::<f64>() / total as f64
        } else {
            0.0
        };

        Ok(GoalSummary {
            total,
            achieved,
            in_progress,
            total_target: goals.iter().map(|g| g.target_amount).sum(),
            total_saved: goals.iter().map(|g| g.current_amount).sum(),
            average_progress,
        })
    }
}

impl LedgerObserver for GoalService<'_> {
    /// Goals ignore the ledger contents; only the clock moves their status.
    fn recompute(&self, _snapshot: &LedgerSnapshot) -> PocketResult<()> {
        self.recompute_all(Utc::now()).map(|_| ())
    }
}
