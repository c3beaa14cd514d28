//! Notification display formatting

use super::{format_percentage, separator, truncate};
use crate::config::NotificationSettings;
use crate::models::{Notification, Priority};
use crate::services::NotificationStats;

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => " ",
        Priority::Normal => "·",
        Priority::High => "!",
        Priority::Urgent => "‼",
    }
}

/// Format a notification list, one entry per two lines
pub fn format_notification_list(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.\n".to_string();
    }

    let mut output = String::new();
    for n in notifications {
        let unread = if n.read { " " } else { "●" };
        output.push_str(&format!(
            "{}{} {:<12} {} [{}/{}] {}\n",
            unread,
            priority_marker(n.priority),
            n.id.to_string(),
            n.timestamp.format("%Y-%m-%d %H:%M"),
            n.category,
            n.priority,
            n.title
        ));
        output.push_str(&format!("     {}\n", truncate(&n.message, 90)));
    }

    output
}

/// Format notification statistics
pub fn format_notification_stats(stats: &NotificationStats) -> String {
    let mut output = String::new();

    output.push_str("Notification Statistics\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!("Total:   {}\n", stats.total));
    output.push_str(&format!(
        "Read:    {} ({})\n",
        stats.read,
        format_percentage(stats.read_percentage)
    ));
    output.push_str(&format!("Unread:  {}\n", stats.unread));

    if !stats.by_type.is_empty() {
        output.push_str("\nBy type:\n");
        for (kind, count) in &stats.by_type {
            output.push_str(&format!("  {:<12} {}\n", kind, count));
        }
    }

    if !stats.by_priority.is_empty() {
        output.push_str("\nBy priority:\n");
        for (priority, count) in stats.by_priority.iter().rev() {
            output.push_str(&format!("  {:<12} {}\n", priority, count));
        }
    }

    if !stats.by_day.is_empty() {
        output.push_str("\nBy day:\n");
        for (day, count) in &stats.by_day {
            output.push_str(&format!("  {}   {}\n", day, count));
        }
    }

    output
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Format the notification settings
pub fn format_notification_settings(settings: &NotificationSettings) -> String {
    let mut output = String::new();
    let toggles = &settings.categories;

    output.push_str("Notification Settings\n");
    output.push_str(&separator(40));
    output.push('\n');
    output.push_str(&format!("Enabled:      {}\n", on_off(settings.enabled)));
    output.push_str(&format!("Sound:        {}\n", on_off(settings.sound)));
    output.push_str(&format!(
        "Quiet hours:  {} ({} to {})\n",
        on_off(settings.quiet_hours.enabled),
        settings.quiet_hours.start,
        settings.quiet_hours.end
    ));
    output.push_str(&format!(
        "Categories:   budget {}, goal {}, bill {}, transaction {}, system {}\n",
        on_off(toggles.budget),
        on_off(toggles.goal),
        on_off(toggles.bill),
        on_off(toggles.transaction),
        on_off(toggles.system)
    ));
    match settings.dedup_window_hours {
        Some(hours) => output.push_str(&format!("Dedup window: {} hours\n", hours)),
        None => output.push_str("Dedup window: off\n"),
    }

    output
}
