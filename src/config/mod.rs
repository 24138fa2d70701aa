//! # Module: Dashboard Configuration
//!
//! ## Responsibility
//! Parse and validate the TOML file that tells the dashboard where its backend
//! lives and how often each widget refreshes:
//! ```text
//! cargo run --bin dashboard -- --config dashboard.toml
//! ```
//!
//! ## Guarantees
//! - Every field has a documented default, so an empty file is a valid config
//! - Validated: semantic constraints are checked before a config is accepted
//! - Schema-exportable: JSON Schema output enables IDE autocomplete
//!
//! ## NOT Responsible For
//! - User preferences such as language (that belongs to `prefs`)
//! - Driving the refresh timers (that belongs to `coordinator`)

pub mod loader;
pub mod validation;

use std::path::PathBuf;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Default value functions ──────────────────────────────────────────────

/// Default backend: the Flask app on its development port.
fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

/// Default per-request timeout: 10 seconds.
fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Clock and countdown redraw period: 1 second.
fn default_tick_ms() -> u64 {
    1000
}

/// Boundary watcher period: 1 second.
fn default_boundary_watch_ms() -> u64 {
    1000
}

/// Timetable poll: every 5 minutes.
fn default_timetable_poll_s() -> u64 {
    300
}

/// Weather poll: every 10 minutes.
fn default_weather_poll_s() -> u64 {
    600
}

/// Delay between the startup snapshot and the full timetable fetch.
fn default_full_load_delay_ms() -> u64 {
    0
}

/// Days-before-exam reminders.
fn default_thresholds_days() -> Vec<i64> {
    vec![7, 3, 1]
}

fn default_true() -> bool {
    true
}

// ── Top-level config ─────────────────────────────────────────────────────

/// Root configuration for a dashboard instance.
///
/// # Example
///
/// ```toml
/// [backend]
/// base_url = "http://dashboard.local:5000"
///
/// [refresh]
/// timetable_poll_s = 300
/// weather_poll_s = 600
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where the backend lives.
    pub backend: BackendConfig,
    /// Refresh periods for each widget.
    pub refresh: RefreshConfig,
    /// Exam reminder settings.
    pub notifications: NotificationConfig,
    /// Local storage locations.
    pub storage: StorageConfig,
    /// Logging output.
    pub observability: ObservabilityConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BackendConfig {
    /// Base URL all endpoint paths are appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl BackendConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Refresh periods. Each period drives one named task in the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct RefreshConfig {
    /// Clock and countdown redraw period (ms).
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Lesson boundary check period (ms).
    #[serde(default = "default_boundary_watch_ms")]
    pub boundary_watch_ms: u64,
    /// Timetable poll period (s).
    #[serde(default = "default_timetable_poll_s")]
    pub timetable_poll_s: u64,
    /// Weather poll period (s).
    #[serde(default = "default_weather_poll_s")]
    pub weather_poll_s: u64,
    /// Render the static timetable snapshot first, then fetch the live one.
    #[serde(default = "default_true")]
    pub fast_load: bool,
    /// Delay (ms) before the live fetch that replaces the snapshot.
    #[serde(default = "default_full_load_delay_ms")]
    pub full_load_delay_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            boundary_watch_ms: default_boundary_watch_ms(),
            timetable_poll_s: default_timetable_poll_s(),
            weather_poll_s: default_weather_poll_s(),
            fast_load: true,
            full_load_delay_ms: default_full_load_delay_ms(),
        }
    }
}

impl RefreshConfig {
    /// Clock tick period.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Boundary watcher period.
    pub fn boundary_watch(&self) -> Duration {
        Duration::from_millis(self.boundary_watch_ms)
    }

    /// Timetable poll period.
    pub fn timetable_poll(&self) -> Duration {
        Duration::from_secs(self.timetable_poll_s)
    }

    /// Weather poll period.
    pub fn weather_poll(&self) -> Duration {
        Duration::from_secs(self.weather_poll_s)
    }

    /// Delay before the live timetable replaces the snapshot.
    pub fn full_load_delay(&self) -> Duration {
        Duration::from_millis(self.full_load_delay_ms)
    }
}

/// Exam reminder settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NotificationConfig {
    /// Remind when an exam is exactly this many days away.
    #[serde(default = "default_thresholds_days")]
    pub thresholds_days: Vec<i64>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            thresholds_days: default_thresholds_days(),
        }
    }
}

/// Local storage locations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct StorageConfig {
    /// Preferences file. `None` uses the platform config directory.
    pub preferences_path: Option<PathBuf>,
}

/// Logging output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Default)]
pub struct ObservabilityConfig {
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Log file. `None` uses `dashboard.log` in the platform's local data
    /// directory; stderr is never used because it shares the terminal.
    pub log_file: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Where the dashboard writes its log.
    ///
    /// # Returns
    /// The configured file, else the platform default, else `None` when the
    /// platform has no local data directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(crate::prefs::default_log_path)
    }
}

/// Log output format.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable log output.
    #[default]
    Pretty,
    /// Structured JSON log output for machine consumption.
    Json,
}

/// Export the JSON Schema for `DashboardConfig`.
///
/// # Errors
///
/// Returns `serde_json::Error` if schema serialization fails.
pub fn export_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(DashboardConfig);
    serde_json::to_string_pretty(&schema)
}
