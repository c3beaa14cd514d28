//! Notification policy and store
//!
//! [`NotificationPolicy`] decides whether a candidate becomes a stored
//! notification and when it expires. [`NotificationService`] owns the stored
//! list and runs the periodic checks.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::config::NotificationSettings;
use crate::error::{PocketError, PocketResult};
use crate::models::{Notification, NotificationCandidate, NotificationId, Priority};
use crate::services::alerts;
use crate::services::budget::BudgetEvaluator;
use crate::services::goal::GoalEvaluator;
use crate::services::ledger::{Ledger, LedgerObserver, LedgerSnapshot};
use crate::storage::Storage;

/// Outcome of running a candidate through the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitDecision {
    Emit,
    Disabled,
    QuietHours,
    CategoryOff,
    Duplicate,
}

/// Gatekeeper between alert generators and the notification store
pub struct NotificationPolicy<'s> {
    settings: &'s NotificationSettings,
}

impl<'s> NotificationPolicy<'s> {
    pub fn new(settings: &'s NotificationSettings) -> Self {
        Self { settings }
    }

    /// Decide on a candidate at wall-clock time `now`
    ///
    /// Quiet hours are compared against `now` in its own time zone. Urgent
    /// candidates pass through quiet hours but not the global switch or a
    /// disabled category.
    pub fn decide<Tz: TimeZone>(
        &self,
        candidate: &NotificationCandidate,
        now: &DateTime<Tz>,
    ) -> EmitDecision {
        if !self.settings.enabled {
            return EmitDecision::Disabled;
        }
        if candidate.priority != Priority::Urgent
            && self.settings.quiet_hours.contains(now.time())
        {
            return EmitDecision::QuietHours;
        }
        if !self.settings.categories.is_enabled(&candidate.category) {
            return EmitDecision::CategoryOff;
        }
        EmitDecision::Emit
    }

    pub fn should_emit<Tz: TimeZone>(
        &self,
        candidate: &NotificationCandidate,
        now: &DateTime<Tz>,
    ) -> bool {
        self.decide(candidate, now) == EmitDecision::Emit
    }

    /// Whether an identical unexpired alert was raised within the dedup window
    ///
    /// Always false unless `dedup_window_hours` is configured.
    pub fn is_duplicate(
        &self,
        candidate: &NotificationCandidate,
        existing: &[Notification],
        now: DateTime<Utc>,
    ) -> bool {
        let Some(hours) = self.settings.dedup_window_hours else {
            return false;
        };
        let since = now - Duration::hours(i64::from(hours));

        existing.iter().any(|n| {
            n.same_content(candidate) && !n.is_expired(now) && n.timestamp >= since
        })
    }

    /// Expiry fixed at creation time
    pub fn expiry_for(priority: Priority, now: DateTime<Utc>) -> DateTime<Utc> {
        let lifetime = match priority {
            Priority::Urgent => Duration::hours(24),
            Priority::High => Duration::hours(72),
            Priority::Normal => Duration::days(7),
            Priority::Low => Duration::days(3),
        };
        now + lifetime
    }

    /// Drop expired notifications, returning how many were removed
    pub fn cleanup(notifications: &mut Vec<Notification>, now: DateTime<Utc>) -> usize {
        let before = notifications.len();
        notifications.retain(|n| !n.is_expired(now));
        before - notifications.len()
    }
}

/// Counts over the stored notifications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationStats {
    pub total: usize,
    pub read: usize,
    pub unread: usize,
    pub read_percentage: f64,
    pub by_type: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_day: BTreeMap<NaiveDate, usize>,
}

/// Service for the notification store
pub struct NotificationService<'a> {
    storage: &'a Storage,
    policy: NotificationPolicy<'a>,
}

impl<'a> NotificationService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a NotificationSettings) -> Self {
        Self {
            storage,
            policy: NotificationPolicy::new(settings),
        }
    }

    pub fn policy(&self) -> &NotificationPolicy<'a> {
        &self.policy
    }

    /// Emit a candidate at the current local time
    pub fn emit(&self, candidate: NotificationCandidate) -> PocketResult<Option<Notification>> {
        self.emit_at(candidate, &Local::now())
    }

    /// Emit a candidate at a given time; `None` when the policy suppresses it
    pub fn emit_at<Tz: TimeZone>(
        &self,
        candidate: NotificationCandidate,
        now: &DateTime<Tz>,
    ) -> PocketResult<Option<Notification>> {
        let decision = self.policy.decide(&candidate, now);
        if decision != EmitDecision::Emit {
            debug!(title = %candidate.title, ?decision, "notification suppressed");
            return Ok(None);
        }

        let now = now.with_timezone(&Utc);
        let policy = &self.policy;
        let stored = self.storage.notifications.update(|items| {
            if policy.is_duplicate(&candidate, items.as_slice(), now) {
                debug!(
                    title = %candidate.title,
                    decision = ?EmitDecision::Duplicate,
                    "notification suppressed"
                );
                return Ok(None);
            }
            let expires_at = NotificationPolicy::expiry_for(candidate.priority, now);
            let notification = Notification::from_candidate(candidate, now, expires_at);
            items.insert(0, notification.clone());
            Ok(Some(notification))
        })?;

        if let Some(notification) = &stored {
            self.storage.notifications.save()?;
            info!(
                id = %notification.id,
                priority = %notification.priority,
                title = %notification.title,
                "notification emitted"
            );
        }
        Ok(stored)
    }

    /// Stored notifications, newest first
    pub fn list(&self, unread_only: bool) -> PocketResult<Vec<Notification>> {
        let mut notifications = self.storage.notifications.get_all()?;
        if unread_only {
            notifications.retain(|n| !n.read);
        }
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notifications)
    }

    /// Resolve a full or short (8-character) id
    pub fn resolve(&self, id: &str) -> PocketResult<NotificationId> {
        if let Ok(parsed) = id.parse::<NotificationId>() {
            return Ok(parsed);
        }
        let matches: Vec<NotificationId> = self
            .storage
            .notifications
            .get_all()?
            .into_iter()
            .map(|n| n.id)
            .filter(|nid| nid.matches_short(id))
            .collect();

        match matches.as_slice() {
            [single] => Ok(*single),
            [] => Err(PocketError::notification_not_found(id)),
            _ => Err(PocketError::Validation(format!(
                "Notification id '{}' is ambiguous",
                id
            ))),
        }
    }

    pub fn mark_read(&self, id: NotificationId) -> PocketResult<Notification> {
        let updated = self.storage.notifications.update(|items| {
            let notification = items
                .iter_mut()
                .find(|n| n.id == id)
                .ok_or_else(|| PocketError::notification_not_found(id.to_string()))?;
            notification.read = true;
            Ok(notification.clone())
        })?;
        self.storage.notifications.save()?;
        Ok(updated)
    }

    /// Mark everything read, returning how many changed
    pub fn mark_all_read(&self) -> PocketResult<usize> {
        let changed = self.storage.notifications.update(|items| {
            let mut changed = 0;
            for notification in items.iter_mut().filter(|n| !n.read) {
                notification.read = true;
                changed += 1;
            }
            Ok(changed)
        })?;
        self.storage.notifications.save()?;
        Ok(changed)
    }

    pub fn delete(&self, id: NotificationId) -> PocketResult<Notification> {
        let removed = self.storage.notifications.update(|items| {
            let index = items
                .iter()
                .position(|n| n.id == id)
                .ok_or_else(|| PocketError::notification_not_found(id.to_string()))?;
            Ok(items.remove(index))
        })?;
        self.storage.notifications.save()?;
        Ok(removed)
    }

    /// Delete everything, returning how many were removed
    pub fn clear(&self) -> PocketResult<usize> {
        let removed = self.storage.notifications.update(|items| {
            let count = items.len();
            items.clear();
            Ok(count)
        })?;
        self.storage.notifications.save()?;
        info!(removed, "cleared notifications");
        Ok(removed)
    }

    /// Remove expired notifications
    pub fn cleanup(&self, now: DateTime<Utc>) -> PocketResult<usize> {
        let removed = self
            .storage
            .notifications
            .update(|items| Ok(NotificationPolicy::cleanup(items, now)))?;
        self.storage.notifications.save()?;
        if removed > 0 {
            info!(removed, "removed expired notifications");
        }
        Ok(removed)
    }

    pub fn stats(&self) -> PocketResult<NotificationStats> {
        let notifications = self.storage.notifications.get_all()?;
        let total = notifications.len();
        let read = notifications.iter().filter(|n| n.read).count();

        let mut by_type = BTreeMap::new();
        let mut by_priority = BTreeMap::new();
        let mut by_day = BTreeMap::new();
        for n in &notifications {
            *by_type.entry(n.kind.clone()).or_insert(0) += 1;
            *by_priority.entry(n.priority).or_insert(0) += 1;
            *by_day.entry(n.timestamp.date_naive()).or_insert(0) += 1;
        }

        Ok(NotificationStats {
            total,
            read,
            unread: total - read,
            read_percentage: if total > 0 {
                read as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            by_type,
            by_priority,
            by_day,
        })
    }

    /// Run every alert generator and a cleanup pass
    ///
    /// Safe to call at any interval; without a dedup window, repeated checks
    /// raise the same alerts again.
    pub fn check_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> PocketResult<Vec<Notification>> {
        let utc_now = now.with_timezone(&Utc);
        let today = now.date_naive();
        let snapshot = Ledger::new(self.storage).snapshot()?;

        let budgets: Vec<_> = self
            .storage
            .budgets
            .get_all()?
            .iter()
            .map(|b| BudgetEvaluator::recompute(b, &snapshot))
            .collect();
        let goals: Vec<_> = self
            .storage
            .goals
            .get_all()?
            .iter()
            .map(|g| GoalEvaluator::recompute(g, utc_now))
            .collect();
        let bills = self.storage.bills.get_all()?;

        let mut candidates = alerts::budget_alerts(&budgets, today);
        candidates.extend(alerts::goal_alerts(&goals));
        candidates.extend(alerts::bill_reminders(&bills, today));
        candidates.extend(alerts::spending_insight(&snapshot, today));
        candidates.extend(alerts::large_transactions(&snapshot));

        let mut emitted = Vec::new();
        for candidate in candidates {
            emitted.extend(self.emit_at(candidate, now)?);
        }
        self.cleanup(utc_now)?;

        info!(count = emitted.len(), "notification check complete");
        Ok(emitted)
    }

    pub fn check(&self) -> PocketResult<Vec<Notification>> {
        self.check_at(&Local::now())
    }

    /// Budget alerts for budgets whose status just moved into warning or exceeded
    ///
    /// Compares the freshly derived status against the persisted one, so this
    /// must run before the budgets are recomputed and saved.
    pub fn on_budget_transitions_at<Tz: TimeZone>(
        &self,
        snapshot: &LedgerSnapshot,
        now: &DateTime<Tz>,
    ) -> PocketResult<Vec<Notification>> {
        let mut emitted = Vec::new();
        for stored in self.storage.budgets.get_all()? {
            let fresh = BudgetEvaluator::recompute(&stored, snapshot);
            if fresh.status == stored.status || !fresh.status.is_alerting() {
                continue;
            }
            debug!(budget = %fresh.name, from = %stored.status, to = %fresh.status, "budget status changed");
            if let Some(candidate) = alerts::budget_usage_alert(&fresh) {
                emitted.extend(self.emit_at(candidate, now)?);
            }
        }
        Ok(emitted)
    }
}

impl LedgerObserver for NotificationService<'_> {
    fn recompute(&self, snapshot: &LedgerSnapshot) -> PocketResult<()> {
        self.on_budget_transitions_at(snapshot, &Local::now())
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PocketPaths;
    use crate::config::QuietHours;
    use crate::models::{Bill, BudgetPeriod, BudgetStatus, TransactionDraft, TransactionKind};
    use crate::services::budget::{BudgetService, CreateBudgetInput};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, h, m, 0).unwrap()
    }

    fn candidate(priority: Priority, category: &str) -> NotificationCandidate {
        NotificationCandidate::new("info", "Title", "Message")
            .priority(priority)
            .category(category)
    }

    fn quiet_settings() -> NotificationSettings {
        NotificationSettings {
            quiet_hours: QuietHours {
                enabled: true,
                start: "22:00".into(),
                end: "07:00".into(),
            },
            ..NotificationSettings::default()
        }
    }

    #[test]
    fn test_policy_quiet_hours() {
        let settings = quiet_settings();
        let policy = NotificationPolicy::new(&settings);

        assert_eq!(
            policy.decide(&candidate(Priority::High, "budget"), &at(23, 30)),
            EmitDecision::QuietHours
        );
        assert_eq!(
            policy.decide(&candidate(Priority::Normal, "budget"), &at(6, 59)),
            EmitDecision::QuietHours
        );
        assert!(policy.should_emit(&candidate(Priority::Urgent, "budget"), &at(23, 30)));
        assert!(policy.should_emit(&candidate(Priority::Low, "budget"), &at(7, 0)));
    }

    #[test]
    fn test_policy_switches() {
        let mut settings = NotificationSettings::default();
        settings.categories.bill = false;
        let policy = NotificationPolicy::new(&settings);
        assert_eq!(
            policy.decide(&candidate(Priority::Urgent, "bill"), &at(12, 0)),
            EmitDecision::CategoryOff
        );
        assert!(policy.should_emit(&candidate(Priority::Low, "goal"), &at(12, 0)));

        settings.categories.bill = true;
        settings.categories.system = false;
        let policy = NotificationPolicy::new(&settings);
        assert!(!policy.should_emit(&candidate(Priority::Low, "general"), &at(12, 0)));

        let disabled = NotificationSettings {
            enabled: false,
            ..NotificationSettings::default()
        };
        let policy = NotificationPolicy::new(&disabled);
        assert_eq!(
            policy.decide(&candidate(Priority::Urgent, "goal"), &at(12, 0)),
            EmitDecision::Disabled
        );
    }

    #[test]
    fn test_expiry_by_priority() {
        let now = at(12, 0);
        assert_eq!(NotificationPolicy::expiry_for(Priority::Urgent, now), now + Duration::hours(24));
        assert_eq!(NotificationPolicy::expiry_for(Priority::High, now), now + Duration::hours(72));
        assert_eq!(NotificationPolicy::expiry_for(Priority::Normal, now), now + Duration::days(7));
        assert_eq!(NotificationPolicy::expiry_for(Priority::Low, now), now + Duration::days(3));
    }

    #[test]
    fn test_low_priority_gone_after_four_days() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings::default();
        let service = NotificationService::new(&storage, &settings);
        let now = at(12, 0);

        service
            .emit_at(candidate(Priority::Low, "system"), &now)
            .unwrap()
            .unwrap();
        service
            .emit_at(candidate(Priority::Normal, "system"), &now)
            .unwrap()
            .unwrap();

        assert_eq!(service.cleanup(now + Duration::days(4)).unwrap(), 1);
        let remaining = service.list(false).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].priority, Priority::Normal);
    }

    #[test]
    fn test_no_dedup_by_default() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings::default();
        let service = NotificationService::new(&storage, &settings);

        service.emit_at(candidate(Priority::Low, "budget"), &at(9, 0)).unwrap();
        service.emit_at(candidate(Priority::Low, "budget"), &at(9, 5)).unwrap();
        assert_eq!(service.list(false).unwrap().len(), 2);
    }

    #[test]
    fn test_dedup_window() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings {
            dedup_window_hours: Some(6),
            ..NotificationSettings::default()
        };
        let service = NotificationService::new(&storage, &settings);

        assert!(service.emit_at(candidate(Priority::Normal, "budget"), &at(9, 0)).unwrap().is_some());
        assert!(service.emit_at(candidate(Priority::Normal, "budget"), &at(10, 0)).unwrap().is_none());
        assert!(service.emit_at(candidate(Priority::Normal, "budget"), &at(16, 0)).unwrap().is_some());
        assert_eq!(service.list(false).unwrap().len(), 2);
    }

    #[test]
    fn test_read_delete_and_stats() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings::default();
        let service = NotificationService::new(&storage, &settings);

        let first = service
            .emit_at(candidate(Priority::High, "goal"), &at(8, 0))
            .unwrap()
            .unwrap();
        service.emit_at(candidate(Priority::Low, "goal"), &at(8, 30)).unwrap();
        service.emit_at(candidate(Priority::Low, "bill"), &at(9, 0)).unwrap();

        service.mark_read(first.id).unwrap();
        assert_eq!(service.list(true).unwrap().len(), 2);

        let short = first.id.to_string();
        assert_eq!(service.resolve(&short).unwrap(), first.id);

        let stats = service.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.read, 1);
        assert_eq!(stats.unread, 2);
        assert!((stats.read_percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.by_type.get("info"), Some(&3));
        assert_eq!(stats.by_priority.get(&Priority::Low), Some(&2));
        assert_eq!(stats.by_day.len(), 1);

        assert_eq!(service.mark_all_read().unwrap(), 2);
        service.delete(first.id).unwrap();
        assert!(service.delete(first.id).unwrap_err().is_not_found());
        assert_eq!(service.clear().unwrap(), 2);
        assert!(service.list(false).unwrap().is_empty());
    }

    #[test]
    fn test_check_raises_bill_and_large_transaction_alerts() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings::default();
        let service = NotificationService::new(&storage, &settings);
        let now = at(12, 0);

        storage
            .bills
            .replace_all(vec![Bill::new("Water", 150.0, now.date_naive(), "Home")])
            .unwrap();
        Ledger::new(&storage)
            .add(TransactionDraft {
                name: "Laptop".into(),
                amount: 2400.0,
                date: now.date_naive(),
                kind: TransactionKind::Expense,
                category: "Shopping".into(),
            })
            .unwrap();

        let emitted = service.check_at(&now).unwrap();
        let titles: Vec<&str> = emitted.iter().map(|n| n.title.as_str()).collect();
        assert!(titles.contains(&"Bill due today"));
        assert!(titles.contains(&"Large transaction"));
    }

    #[test]
    fn test_observer_emits_on_status_transition_only() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = NotificationSettings::default();
        let notifications = NotificationService::new(&storage, &settings);
        let budgets = BudgetService::new(&storage);
        let today = Local::now().date_naive();

        budgets
            .create(CreateBudgetInput {
                name: "Fun".into(),
                amount: 100.0,
                period: BudgetPeriod::Monthly,
                categories: vec!["Entertainment".into()],
                start_date: today,
            })
            .unwrap();

        let ledger = Ledger::new(&storage)
            .subscribe(&notifications)
            .subscribe(&budgets);
        let spend = |amount: f64| TransactionDraft {
            name: "Show".into(),
            amount,
            date: today,
            kind: TransactionKind::Expense,
            category: "Entertainment".into(),
        };

        ledger.add(spend(50.0)).unwrap();
        assert!(notifications.list(false).unwrap().is_empty());

        // good -> warning
        ledger.add(spend(35.0)).unwrap();
        assert_eq!(notifications.list(false).unwrap().len(), 1);

        // still warning: no new alert
        ledger.add(spend(1.0)).unwrap();
        assert_eq!(notifications.list(false).unwrap().len(), 1);

        // warning -> exceeded
        ledger.add(spend(20.0)).unwrap();
        let all = notifications.list(false).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|n| n.title == "Budget exceeded"));

        let stored = budgets.list().unwrap();
        assert_eq!(stored[0].status, BudgetStatus::Exceeded);
    }
}
