//! Notification model
//!
//! Stored alerts produced by the notification policy. A notification is created
//! unread, may be marked read, and leaves the store when deleted or when its
//! expiry passes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::NotificationId;

/// Notification priority; drives expiry and quiet-hours bypass
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Follow-up the front end can offer for a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl NotificationAction {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// An alert proposed to the policy, not yet stored
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationCandidate {
    /// Display tag such as "info", "warning" or "danger"
    pub kind: String,
    pub title: String,
    pub message: String,
    pub priority: Priority,
    /// Toggle category: budget, goal, bill, transaction or system
    pub category: String,
    pub action: Option<NotificationAction>,
}

impl NotificationCandidate {
    /// New candidate with normal priority in the "general" category
    pub fn new(kind: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            priority: Priority::Normal,
            category: "general".to_string(),
            action: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// A stored notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,

    #[serde(rename = "type")]
    pub kind: String,

    pub title: String,
    pub message: String,
    pub priority: Priority,
    pub category: String,

    #[serde(default)]
    pub read: bool,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Fixed at creation from the priority
    pub expires_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// Materialize a candidate
    pub fn from_candidate(
        candidate: NotificationCandidate,
        timestamp: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            kind: candidate.kind,
            title: candidate.title,
            message: candidate.message,
            priority: candidate.priority,
            category: candidate.category,
            read: false,
            timestamp,
            expires_at,
            action: candidate.action,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Same type, title and message as a candidate
    pub fn same_content(&self, candidate: &NotificationCandidate) -> bool {
        self.kind == candidate.kind
            && self.title == candidate.title
            && self.message == candidate.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_candidate_defaults() {
        let candidate = NotificationCandidate::new("info", "Hello", "World");
        assert_eq!(candidate.priority, Priority::Normal);
        assert_eq!(candidate.category, "general");
        assert!(candidate.action.is_none());
    }

    #[test]
    fn test_from_candidate_starts_unread() {
        let now = Utc::now();
        let candidate = NotificationCandidate::new("warning", "Budget", "80% used")
            .priority(Priority::Low)
            .category("budget")
            .action(NotificationAction::new("view_budget", "bud-1"));
        let notification =
            Notification::from_candidate(candidate.clone(), now, now + Duration::days(3));

        assert!(!notification.read);
        assert_eq!(notification.category, "budget");
        assert!(notification.same_content(&candidate));
        assert!(!notification.is_expired(now));
        assert!(notification.is_expired(now + Duration::days(3)));
    }

    #[test]
    fn test_priority_ordering_and_parse() {
        assert!(Priority::Urgent > Priority::High);
        assert!(Priority::Low < Priority::Normal);
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("critical".parse::<Priority>().is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let now = Utc::now();
        let n = Notification::from_candidate(
            NotificationCandidate::new("danger", "t", "m").action(NotificationAction::new("view_goal", "goal-1")),
            now,
            now,
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "danger");
        assert_eq!(json["priority"], "normal");
        assert_eq!(json["action"]["type"], "view_goal");
    }
}
