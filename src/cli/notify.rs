//! Notification CLI commands
//!
//! Listing and housekeeping for stored notifications, the on-demand alert
//! check, and the notification settings editor.

use chrono::Utc;
use clap::{Args, Subcommand};

use crate::config::paths::PocketPaths;
use crate::config::settings::{NotificationSettingsPatch, Settings};
use crate::display::notification::{
    format_notification_list, format_notification_settings, format_notification_stats,
};
use crate::error::{PocketError, PocketResult};
use crate::services::NotificationService;
use crate::storage::Storage;

/// Notification subcommands
#[derive(Subcommand)]
pub enum NotifyCommands {
    /// List notifications, newest first
    List {
        /// Only unread notifications
        #[arg(short, long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID (full or the 8-character short form)
        id: String,
    },

    /// Mark every notification as read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification ID (full or the 8-character short form)
        id: String,
    },

    /// Delete all notifications
    Clear,

    /// Drop expired notifications
    Cleanup,

    /// Run budget, goal, bill and spending checks now
    Check,

    /// Show notification statistics
    Stats,

    /// Show or change notification settings
    Settings(SettingsArgs),
}

/// Options for `notify settings`; with none given the current settings are shown
#[derive(Args, Default)]
pub struct SettingsArgs {
    /// Turn notifications on
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    /// Turn notifications off
    #[arg(long)]
    pub disable: bool,
    /// Turn sound on or off
    #[arg(long, value_name = "on|off")]
    pub sound: Option<String>,
    /// Turn quiet hours on or off
    #[arg(long, value_name = "on|off")]
    pub quiet: Option<String>,
    /// Quiet hours start (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub quiet_start: Option<String>,
    /// Quiet hours end (HH:MM)
    #[arg(long, value_name = "HH:MM")]
    pub quiet_end: Option<String>,
    /// Toggle a category, e.g. `--toggle budget=off`
    #[arg(long, value_name = "CATEGORY=on|off")]
    pub toggle: Vec<String>,
    /// Suppress repeats of the same alert within this many hours
    #[arg(long, value_name = "HOURS", conflicts_with = "no_dedup")]
    pub dedup_hours: Option<u32>,
    /// Never suppress repeated alerts
    #[arg(long)]
    pub no_dedup: bool,
}

fn parse_switch(value: &str) -> PocketResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(PocketError::Validation(format!(
            "Expected on or off, got '{}'",
            other
        ))),
    }
}

impl SettingsArgs {
    fn into_patch(self) -> PocketResult<NotificationSettingsPatch> {
        let enabled = match (self.enable, self.disable) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        let category_toggles = self
            .toggle
            .iter()
            .map(|entry| {
                let (category, value) = entry.split_once('=').ok_or_else(|| {
                    PocketError::Validation(format!(
                        "Expected CATEGORY=on|off, got '{}'",
                        entry
                    ))
                })?;
                Ok((category.trim().to_lowercase(), parse_switch(value)?))
            })
            .collect::<PocketResult<Vec<_>>>()?;

        let dedup_window_hours = if self.no_dedup {
            Some(None)
        } else {
            self.dedup_hours.map(Some)
        };

        Ok(NotificationSettingsPatch {
            enabled,
            sound: self.sound.as_deref().map(parse_switch).transpose()?,
            quiet_hours_enabled: self.quiet.as_deref().map(parse_switch).transpose()?,
            quiet_start: self.quiet_start,
            quiet_end: self.quiet_end,
            category_toggles,
            dedup_window_hours,
        })
    }
}

/// Handle a notification command
///
/// Takes the settings mutably because `notify settings` edits and saves them.
pub fn handle_notify_command(
    storage: &Storage,
    paths: &PocketPaths,
    settings: &mut Settings,
    cmd: NotifyCommands,
) -> PocketResult<()> {
    let service = || NotificationService::new(storage, &settings.notifications);

    match cmd {
        NotifyCommands::List { unread } => {
            print!("{}", format_notification_list(&service().list(unread)?));
        }
        NotifyCommands::Read { id } => {
            let service = service();
            let notification = service.mark_read(service.resolve(&id)?)?;
            println!("Marked {} as read", notification.id);
        }
        NotifyCommands::ReadAll => {
            let count = service().mark_all_read()?;
            println!("Marked {} notifications as read", count);
        }
        NotifyCommands::Delete { id } => {
            let service = service();
            let notification = service.delete(service.resolve(&id)?)?;
            println!("Deleted {} ({})", notification.id, notification.title);
        }
        NotifyCommands::Clear => {
            let count = service().clear()?;
            println!("Deleted {} notifications", count);
        }
        NotifyCommands::Cleanup => {
            let count = service().cleanup(Utc::now())?;
            println!("Removed {} expired notifications", count);
        }
        NotifyCommands::Check => {
            let emitted = service().check()?;
            if emitted.is_empty() {
                println!("Nothing new.");
            } else {
                println!("{} new notifications:", emitted.len());
                print!("{}", format_notification_list(&emitted));
            }
        }
        NotifyCommands::Stats => {
            print!("{}", format_notification_stats(&service().stats()?));
        }
        NotifyCommands::Settings(args) => {
            let patch = args.into_patch()?;
            if !patch.is_empty() {
                settings.notifications.apply(patch)?;
                settings.save(paths)?;
                println!("Notification settings updated.");
                println!();
            }
            print!("{}", format_notification_settings(&settings.notifications));
        }
    }

    Ok(())
}
