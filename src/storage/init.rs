//! Storage initialization
//!
//! First-run setup: directories, default categories and a settings file.

use crate::config::paths::PocketPaths;
use crate::config::settings::Settings;
use crate::error::PocketError;
use crate::models::default_categories;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing files are left alone, so running this twice is harmless.
pub fn initialize_storage(paths: &PocketPaths) -> Result<(), PocketError> {
    paths.ensure_directories()?;

    if !paths.categories_file().exists() {
        write_json_atomic(paths.categories_file(), &default_categories())?;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PocketPaths) -> bool {
    !paths.is_initialized()
}
