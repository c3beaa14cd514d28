//! User settings for pocket-ledger
//!
//! Manages user preferences including display options, the default inflation
//! assumption for projections, and the notification policy configuration.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::paths::PocketPaths;
use crate::error::PocketError;

/// Daily window during which non-urgent notifications are suppressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    #[serde(default)]
    pub enabled: bool,

    /// Window start, "HH:MM"
    #[serde(default = "default_quiet_start")]
    pub start: String,

    /// Window end (exclusive), "HH:MM"
    #[serde(default = "default_quiet_end")]
    pub end: String,
}

fn default_quiet_start() -> String {
    "22:00".to_string()
}

fn default_quiet_end() -> String {
    "07:00".to_string()
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: default_quiet_start(),
            end: default_quiet_end(),
        }
    }
}

impl QuietHours {
    /// Check whether a wall-clock time falls inside the window
    ///
    /// A window whose start is after its end wraps midnight. Unparseable bounds
    /// never match.
    pub fn contains(&self, time: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }

        let (Some(start), Some(end)) = (parse_minutes(&self.start), parse_minutes(&self.end))
        else {
            return false;
        };
        let current = time.hour() * 60 + time.minute();

        if start < end {
            current >= start && current < end
        } else {
            current >= start || current < end
        }
    }
}

/// Parse "HH:MM" into minutes past midnight
pub fn parse_minutes(value: &str) -> Option<u32> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

/// Per-category notification toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryToggles {
    #[serde(default = "enabled")]
    pub budget: bool,
    #[serde(default = "enabled")]
    pub goal: bool,
    #[serde(default = "enabled")]
    pub bill: bool,
    #[serde(default = "enabled")]
    pub transaction: bool,
    #[serde(default = "enabled")]
    pub system: bool,
}

fn enabled() -> bool {
    true
}

impl Default for CategoryToggles {
    fn default() -> Self {
        Self {
            budget: true,
            goal: true,
            bill: true,
            transaction: true,
            system: true,
        }
    }
}

impl CategoryToggles {
    /// Look up the toggle for a notification category
    ///
    /// Anything that is not one of the known categories falls under `system`.
    pub fn is_enabled(&self, category: &str) -> bool {
        match category {
            "budget" => self.budget,
            "goal" => self.goal,
            "bill" => self.bill,
            "transaction" => self.transaction,
            _ => self.system,
        }
    }

    /// Whether a name is one of the toggleable categories
    pub fn is_known(category: &str) -> bool {
        matches!(
            category,
            "budget" | "goal" | "bill" | "transaction" | "system"
        )
    }

    /// Set a toggle by category name, returning false for unknown names
    pub fn set(&mut self, category: &str, value: bool) -> bool {
        let slot = match category {
            "budget" => &mut self.budget,
            "goal" => &mut self.goal,
            "bill" => &mut self.bill,
            "transaction" => &mut self.transaction,
            "system" => &mut self.system,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// Notification policy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "enabled")]
    pub enabled: bool,

    #[serde(default = "enabled")]
    pub sound: bool,

    /// Delivery channels handled by the front end; stored only
    #[serde(default)]
    pub desktop: bool,
    #[serde(default)]
    pub email: bool,
    #[serde(default)]
    pub push: bool,

    #[serde(default)]
    pub quiet_hours: QuietHours,

    #[serde(default)]
    pub categories: CategoryToggles,

    /// Suppress repeats of an identical alert raised within this many hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_window_hours: Option<u32>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            desktop: false,
            email: false,
            push: false,
            quiet_hours: QuietHours::default(),
            categories: CategoryToggles::default(),
            dedup_window_hours: None,
        }
    }
}

/// Partial update for [`NotificationSettings`]; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct NotificationSettingsPatch {
    pub enabled: Option<bool>,
    pub sound: Option<bool>,
    pub quiet_hours_enabled: Option<bool>,
    pub quiet_start: Option<String>,
    pub quiet_end: Option<String>,
    pub category_toggles: Vec<(String, bool)>,
    pub dedup_window_hours: Option<Option<u32>>,
}

impl NotificationSettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.sound.is_none()
            && self.quiet_hours_enabled.is_none()
            && self.quiet_start.is_none()
            && self.quiet_end.is_none()
            && self.category_toggles.is_empty()
            && self.dedup_window_hours.is_none()
    }
}

impl NotificationSettings {
    /// Merge a partial update into these settings
    pub fn apply(&mut self, patch: NotificationSettingsPatch) -> Result<(), PocketError> {
        for bound in [&patch.quiet_start, &patch.quiet_end].into_iter().flatten() {
            if parse_minutes(bound).is_none() {
                return Err(PocketError::Validation(format!(
                    "Quiet hours must be HH:MM, got '{}'",
                    bound
                )));
            }
        }

        for (category, _) in &patch.category_toggles {
            if !CategoryToggles::is_known(category) {
                return Err(PocketError::Validation(format!(
                    "Unknown notification category '{}'",
                    category
                )));
            }
        }

        if let Some(v) = patch.enabled {
            self.enabled = v;
        }
        if let Some(v) = patch.sound {
            self.sound = v;
        }
        if let Some(v) = patch.quiet_hours_enabled {
            self.quiet_hours.enabled = v;
        }
        if let Some(v) = patch.quiet_start {
            self.quiet_hours.start = v.trim().to_string();
        }
        if let Some(v) = patch.quiet_end {
            self.quiet_hours.end = v.trim().to_string();
        }
        for (category, value) in patch.category_toggles {
            self.categories.set(&category, value);
        }
        if let Some(v) = patch.dedup_window_hours {
            self.dedup_window_hours = v;
        }

        Ok(())
    }
}

/// User settings for pocket-ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Inflation assumption for savings projections, in percent
    #[serde(default = "default_inflation")]
    pub inflation_percent: f64,

    /// Maximum number of saved calculations kept in history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_inflation() -> f64 {
    3.0
}

fn default_history_limit() -> usize {
    50
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            inflation_percent: default_inflation(),
            history_limit: default_history_limit(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PocketPaths) -> Result<Self, PocketError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| PocketError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PocketError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Set the transaction date format after checking it renders a date
    pub fn set_date_format(&mut self, pattern: &str) -> Result<(), PocketError> {
        let sample = NaiveDate::from_ymd_opt(2000, 1, 31)
            .ok_or_else(|| PocketError::Config("Invalid sample date".into()))?;
        let mut rendered = String::new();
        if pattern.trim().is_empty() || write!(rendered, "{}", sample.format(pattern)).is_err() {
            return Err(PocketError::Validation(format!(
                "Invalid date format '{}'",
                pattern
            )));
        }
        self.date_format = pattern.to_string();
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PocketPaths) -> Result<(), PocketError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PocketError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PocketError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
