//! Configuration validation engine.
//!
//! ## Responsibility
//! Validate semantic constraints on a parsed [`DashboardConfig`] that cannot
//! be expressed through the type system alone (URL scheme, period ranges,
//! reminder thresholds).
//!
//! ## Guarantees
//! - Validation collects *all* errors before returning (no short-circuit)
//! - Error messages include the field path and the invalid value
//!
//! ## NOT Responsible For
//! - Parsing TOML (that belongs to `loader`)
//! - File I/O (that belongs to `loader`)

use super::DashboardConfig;

/// Shortest accepted clock/boundary period.
const MIN_TICK_MS: u64 = 100;

/// Longest accepted clock/boundary period. Countdowns show seconds.
const MAX_TICK_MS: u64 = 1000;

/// Shortest accepted backend poll period.
const MIN_POLL_S: u64 = 10;

/// Errors arising from configuration parsing, validation, or I/O.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("Parse error in {file}: {source}")]
    Parse {
        /// Path of the file that failed to parse.
        file: String,
        /// Underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// One or more semantic validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A specific field has an out-of-range or contradictory value.
    #[error("Field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        /// Dot-separated field path (e.g., "refresh.tick_ms").
        field: String,
        /// String representation of the invalid value.
        value: String,
        /// Human-readable explanation of the constraint.
        reason: String,
    },

    /// File I/O error.
    #[error("IO error reading {file}: {source}")]
    Io {
        /// Path of the file that could not be read.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Validate all semantic constraints on a [`DashboardConfig`].
///
/// # Returns
///
/// - `Ok(())` if all constraints pass.
/// - `Err(Vec<ConfigError>)` with every violation found.
pub fn validate(config: &DashboardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // ── Backend ──────────────────────────────────────────────────────
    let base_url = config.backend.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::InvalidField {
            field: "backend.base_url".into(),
            value: config.backend.base_url.clone(),
            reason: "must start with http:// or https://".into(),
        });
    }

    if config.backend.request_timeout_ms == 0 {
        errors.push(ConfigError::InvalidField {
            field: "backend.request_timeout_ms".into(),
            value: "0".into(),
            reason: "must be at least 1ms".into(),
        });
    }

    // ── Tick periods ─────────────────────────────────────────────────
    for (field, value) in [
        ("refresh.tick_ms", config.refresh.tick_ms),
        ("refresh.boundary_watch_ms", config.refresh.boundary_watch_ms),
    ] {
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&value) {
            errors.push(ConfigError::InvalidField {
                field: field.into(),
                value: value.to_string(),
                reason: format!("must be between {MIN_TICK_MS} and {MAX_TICK_MS}"),
            });
        }
    }

    // ── Poll periods ─────────────────────────────────────────────────
    for (field, value) in [
        ("refresh.timetable_poll_s", config.refresh.timetable_poll_s),
        ("refresh.weather_poll_s", config.refresh.weather_poll_s),
    ] {
        if value < MIN_POLL_S {
            errors.push(ConfigError::InvalidField {
                field: field.into(),
                value: value.to_string(),
                reason: format!("must be at least {MIN_POLL_S} seconds"),
            });
        }
    }

    // ── Exam reminders ───────────────────────────────────────────────
    for days in &config.notifications.thresholds_days {
        if !(1..=365).contains(days) {
            errors.push(ConfigError::InvalidField {
                field: "notifications.thresholds_days".into(),
                value: days.to_string(),
                reason: "each threshold must be between 1 and 365 days".into(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
