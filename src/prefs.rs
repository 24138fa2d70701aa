//! # Module: User Preferences
//!
//! ## Responsibility
//! Persist the two user toggles (UI language, exam notifications) across
//! restarts in a small JSON file under the platform config directory.
//!
//! ## Guarantees
//! - A missing file loads as defaults (German, notifications off)
//! - Saving creates the parent directory if needed

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::DashboardError;

/// File name inside the application config directory.
const PREFERENCES_FILE: &str = "preferences.json";

/// Application directory name under the platform config directory.
const APP_DIR: &str = "school-dashboard";

/// Log file name used when none is configured.
const LOG_FILE: &str = "dashboard.log";

/// Persisted user toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// UI language.
    pub language: Language,
    /// Whether exam reminders are shown.
    pub notifications: bool,
}

/// `<config dir>/school-dashboard/preferences.json`, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFERENCES_FILE))
}

/// `<local data dir>/school-dashboard/dashboard.log`, if the platform has one.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(LOG_FILE))
}

impl Preferences {
    /// Loads preferences from `path`; a missing file yields defaults.
    ///
    /// # Errors
    /// Returns [`DashboardError::Preferences`] if the file exists but cannot be
    /// read or parsed.
    pub fn load(path: &Path) -> Result<Self, DashboardError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(DashboardError::Preferences(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Preferences(format!("{}: {e}", path.display())))
    }

    /// Writes preferences to `path`.
    ///
    /// # Errors
    /// Returns [`DashboardError::Preferences`] on any I/O or encoding failure.
    pub fn save(&self, path: &Path) -> Result<(), DashboardError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DashboardError::Preferences(format!("{}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::Preferences(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| DashboardError::Preferences(format!("{}: {e}", path.display())))
    }
}
