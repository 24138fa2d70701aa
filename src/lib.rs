//! # school-dashboard
//!
//! A terminal dashboard for the school day: wall clock, countdowns to the next
//! and current lesson, today's timetable, upcoming exams, weather, a weekly
//! schedule overlay, an AI chat line, and an ISY message-board panel.
//!
//! ## Architecture
//!
//! ```text
//!             ┌────────────── UI loop (single writer) ──────────────┐
//! keys ──▶ events ──▶ Command ──▶ Coordinator ──▶ FetchRequest ──▶ Dispatcher
//!                                    ▲  │                              │
//!                  scheduler ticks ──┘  ▼                              ▼
//!                                   App state ◀── FetchOutcome ◀── tokio tasks
//!                                       │                          (ApiClient)
//!                                       ▼
//!                                   ui::draw
//! ```
//!
//! All display state lives in one [`tui::app::App`]. Backend calls run on
//! tokio tasks and only report results back; the UI loop applies them,
//! discarding any result older than one already applied for the same feed.

// ── Lint policy ───────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(missing_docs)]

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub mod api;
pub mod config;
pub mod coordinator;
pub mod i18n;
pub mod launch;
pub mod prefs;
pub mod tui;

pub use api::client::ApiClient;
pub use config::DashboardConfig;
pub use coordinator::{Command, Coordinator, FetchOutcome, FetchRequest};

use config::LogFormat;

/// Initialise the global tracing subscriber.
///
/// `format` chooses between structured JSON and human-readable output. When
/// `log_file` is set, events are appended to that file instead of stderr,
/// which keeps the terminal UI intact while the dashboard runs.
///
/// Filter level is controlled by `RUST_LOG` (e.g. `RUST_LOG=info`).
///
/// # Errors
///
/// Returns [`DashboardError::Other`] if the log file cannot be opened or the
/// global subscriber has already been set.
pub fn init_tracing(format: &LogFormat, log_file: Option<&Path>) -> Result<(), DashboardError> {
    let result = match (format, log_file) {
        (LogFormat::Json, Some(path)) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .with_current_span(true)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (LogFormat::Pretty, Some(path)) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (LogFormat::Json, None) => tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .with_current_span(true)
            .with_writer(std::io::stderr)
            .try_init(),
        (LogFormat::Pretty, None) => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init(),
    };

    result.map_err(|e| DashboardError::Other(format!("tracing init failed: {e}")))
}

fn open_log_file(path: &Path) -> Result<std::fs::File, DashboardError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DashboardError::Other(format!("cannot open log file {}: {e}", path.display())))
}

/// Top-level dashboard errors.
///
/// Every failure a widget can show maps to a variant here. None of them is
/// fatal to the UI loop; they are rendered inline in the affected widget.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Netzwerkfehler: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status and no usable body.
    #[error("HTTP {status} von {endpoint}")]
    Status {
        /// Request path, e.g. `/api/weather`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body did not match the expected shape.
    #[error("Ungültige Antwort von {endpoint}: {reason}")]
    Decode {
        /// Request path.
        endpoint: String,
        /// Decoder message.
        reason: String,
    },

    /// The backend reported an error in its `error` field.
    #[error("{0}")]
    Backend(String),

    /// The ISY session expired; the user must log in again.
    #[error("Anmeldung erforderlich")]
    LoginRequired,

    /// Reading or writing the preferences file failed.
    #[error("Einstellungen konnten nicht gespeichert werden: {0}")]
    Preferences(String),

    /// Catch-all for errors that do not fit a specific variant.
    #[error("{0}")]
    Other(String),
}

impl DashboardError {
    /// Whether this error means the ISY session must be re-established.
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}
