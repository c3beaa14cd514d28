//! Configuration module for pocket-ledger
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence (display, inflation default, notification policy)

pub mod paths;
pub mod settings;

pub use paths::PocketPaths;
pub use settings::{NotificationSettings, QuietHours, Settings};
