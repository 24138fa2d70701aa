//! # Module: TUI App State
//!
//! ## Responsibility
//! Owns all dashboard state. The `App` struct is the single source of truth for
//! every widget; the coordinator writes fetch results into it and the render
//! functions only read it.
//!
//! ## Guarantees
//! - `VecDeque` collections are bounded and never grow unbounded
//! - `on_tick()` never panics and never touches the network
//! - Preference changes are written to disk immediately; a failed write is
//!   logged, never fatal

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::api::types::{
    ChatTurn, MessageDetail, MessageFolder, MessageId, MessageSummary, TimetableResponse,
    WeatherReport, WeeklyResponse,
};
use crate::api::TimetableSource;
use crate::coordinator::countdown::{Countdown, CountdownKind, CountdownTick};
use crate::i18n::{Language, Strings};
use crate::launch::SearchEngine;
use crate::prefs::Preferences;

/// Maximum number of log entries retained for display.
pub const LOG_ENTRIES_CAP: usize = 50;

/// Maximum number of notices (exam reminders, session messages) kept.
pub const NOTICES_CAP: usize = 5;

/// Minimum terminal width for the dashboard to render.
pub const MIN_COLS: u16 = 100;

/// Minimum terminal height for the dashboard to render.
pub const MIN_ROWS: u16 = 32;

/// Data that arrives from the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    /// Not requested yet.
    #[default]
    Idle,
    /// Request in flight, nothing to show yet.
    Loading,
    /// Data available.
    Ready(T),
    /// The last request failed. Holds the error detail; the widget prefixes
    /// it with its own localized headline.
    Failed(String),
}

impl<T> Loadable<T> {
    /// The data, if available.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What keystrokes currently feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys are shortcuts.
    #[default]
    Normal,
    /// Typing a chat question.
    Chat,
    /// Typing the ISY username.
    LoginUser,
    /// Typing the ISY password.
    LoginPassword,
    /// Typing a web search.
    Search,
}

/// AI chat transcript.
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// Completed turns, oldest first. Sent as history with the next question.
    pub history: Vec<ChatTurn>,
    /// Question awaiting a reply.
    pub pending: Option<String>,
    /// Error from the last send, shown below the transcript.
    pub error: Option<String>,
}

/// ISY message board state.
#[derive(Debug, Clone, Default)]
pub struct IsyState {
    /// Whether the backend holds a session.
    pub logged_in: bool,
    /// Account name.
    pub username: Option<String>,
    /// Folder shown in the list.
    pub folder: MessageFolder,
    /// Messages in `folder`.
    pub messages: Loadable<Vec<MessageSummary>>,
    /// Highlighted row.
    pub selected: usize,
    /// Opened message overlay.
    pub open_message: Option<Loadable<MessageDetail>>,
    /// Error from the last login attempt.
    pub login_error: Option<String>,
    /// Username entered before the password prompt.
    pub pending_username: String,
}

impl IsyState {
    /// Id of the highlighted message.
    pub fn selected_id(&self) -> Option<&MessageId> {
        self.messages
            .ready()
            .and_then(|list| list.get(self.selected))
            .map(|m| &m.id)
    }
}

/// A single log entry for the log tail widget.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Formatted timestamp string, e.g. "14:32:01".
    pub timestamp: String,
    /// Severity level.
    pub level: LogLevel,
    /// Primary log message.
    pub message: String,
    /// Structured fields as a formatted string.
    pub fields: String,
}

/// Log severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational message.
    Info,
    /// Warning condition.
    Warn,
    /// Error condition.
    Error,
    /// Debug-level message.
    Debug,
}

impl LogLevel {
    /// Returns the display label for this log level.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO ",
            Self::Warn => "WARN ",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }
}

/// Primary application state for the dashboard.
#[derive(Debug)]
pub struct App {
    /// Whether the application should exit.
    pub should_quit: bool,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Whether the weekly schedule overlay is visible.
    pub show_weekly: bool,
    /// Where keystrokes go.
    pub input_mode: InputMode,
    /// Text typed in the current input mode.
    pub input_buffer: String,
    /// Provider the search bar submits to.
    pub search_engine: SearchEngine,
    /// Monotonic tick counter (incremented each clock tick).
    pub tick_count: u64,

    /// Active string table.
    pub strings: Strings,
    /// Persisted toggles.
    pub prefs: Preferences,
    /// Where `prefs` is saved. `None` disables saving.
    pub prefs_path: Option<PathBuf>,

    /// Wall time at the last tick.
    pub clock: DateTime<Utc>,
    /// Countdown to the next lesson start.
    pub next_countdown: Option<Countdown>,
    /// Countdown to the current lesson end.
    pub current_countdown: Option<Countdown>,

    /// Timetable, exams and today's lessons.
    pub timetable: Loadable<TimetableResponse>,
    /// Which endpoint produced `timetable`.
    pub timetable_source: Option<TimetableSource>,
    /// Weekly schedule for the overlay.
    pub weekly: Loadable<WeeklyResponse>,
    /// Current weather.
    pub weather: Loadable<WeatherReport>,

    /// AI chat.
    pub chat: ChatState,
    /// ISY message board.
    pub isy: IsyState,

    /// Exam reminders and session notices, newest at the back.
    pub notices: VecDeque<String>,
    /// Rolling log entries, newest at the back.
    pub log_entries: VecDeque<LogEntry>,
    /// Lines scrolled up from the newest log entry.
    pub log_scroll_offset: usize,
}

impl App {
    /// Creates a new `App` with default/empty state.
    ///
    /// # Arguments
    /// * `prefs` - Preferences loaded at startup.
    /// * `prefs_path` - Where toggles are saved; `None` keeps them in memory.
    ///
    /// # Returns
    /// A fresh `App` instance ready for the event loop.
    pub fn new(prefs: Preferences, prefs_path: Option<PathBuf>) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            show_weekly: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            search_engine: SearchEngine::default(),
            tick_count: 0,

            strings: Strings::new(prefs.language),
            prefs,
            prefs_path,

            clock: Utc::now(),
            next_countdown: None,
            current_countdown: None,

            timetable: Loadable::Loading,
            timetable_source: None,
            weekly: Loadable::Idle,
            weather: Loadable::Loading,

            chat: ChatState::default(),
            isy: IsyState::default(),

            notices: VecDeque::with_capacity(NOTICES_CAP),
            log_entries: VecDeque::with_capacity(LOG_ENTRIES_CAP),
            log_scroll_offset: 0,
        }
    }

    /// Current UI language.
    pub fn language(&self) -> Language {
        self.strings.language()
    }

    /// Advances the clock and both countdowns.
    pub fn on_tick(&mut self, now: DateTime<Utc>) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.clock = now;

        let mut expired = Vec::new();
        for countdown in [&mut self.next_countdown, &mut self.current_countdown]
            .into_iter()
            .flatten()
        {
            if countdown.tick(now) == CountdownTick::Expired {
                expired.push(countdown.kind());
            }
        }
        for kind in expired {
            let key = match kind {
                CountdownKind::LessonStart => "lesson_starting",
                CountdownKind::LessonEnd => "lesson_ended",
            };
            let message = self.strings.get(key).to_string();
            self.log(LogLevel::Info, message, String::new());
        }
    }

    /// Replaces both countdowns and computes them against `now` right away.
    pub fn set_countdowns(
        &mut self,
        next: Option<Countdown>,
        current: Option<Countdown>,
        now: DateTime<Utc>,
    ) {
        self.next_countdown = next;
        self.current_countdown = current;
        for countdown in [&mut self.next_countdown, &mut self.current_countdown]
            .into_iter()
            .flatten()
        {
            countdown.tick(now);
        }
    }

    /// Switches the UI language and persists the choice.
    pub fn set_language(&mut self, language: Language) {
        self.strings.set_language(language);
        self.prefs.language = language;
        self.save_preferences();
    }

    /// Flips exam notifications and persists the choice.
    ///
    /// # Returns
    /// The new setting.
    pub fn toggle_notifications(&mut self) -> bool {
        self.prefs.notifications = !self.prefs.notifications;
        self.save_preferences();
        let key = if self.prefs.notifications {
            "notifications_on"
        } else {
            "notifications_off"
        };
        let message = self.strings.get(key).to_string();
        self.push_notice(message);
        self.prefs.notifications
    }

    /// Writes preferences if a path is configured.
    pub fn save_preferences(&mut self) {
        let Some(path) = self.prefs_path.clone() else {
            return;
        };
        if let Err(e) = self.prefs.save(&path) {
            warn!(error = %e, "preferences not saved");
            self.log(LogLevel::Error, e.to_string(), String::new());
        }
    }

    /// Drops the local ISY session after the backend reported it gone.
    pub fn clear_isy_session(&mut self) {
        self.isy.logged_in = false;
        self.isy.username = None;
        self.isy.messages = Loadable::Idle;
        self.isy.selected = 0;
        self.isy.open_message = None;
        let message = self.strings.get("session_expired").to_string();
        self.push_notice(message);
    }

    /// Moves the message selection up.
    pub fn select_previous(&mut self) {
        self.isy.selected = self.isy.selected.saturating_sub(1);
    }

    /// Moves the message selection down, stopping at the last message.
    pub fn select_next(&mut self) {
        let len = self.isy.messages.ready().map_or(0, Vec::len);
        if self.isy.selected + 1 < len {
            self.isy.selected += 1;
        }
    }

    /// Pushes a notice, evicting the oldest if at capacity.
    pub fn push_notice(&mut self, notice: String) {
        if self.notices.len() >= NOTICES_CAP {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }

    /// Pushes a log entry, evicting the oldest if at capacity.
    pub fn push_log(&mut self, entry: LogEntry) {
        if self.log_entries.len() >= LOG_ENTRIES_CAP {
            self.log_entries.pop_front();
        }
        self.log_entries.push_back(entry);
    }

    /// Pushes a log entry stamped with the local wall time.
    pub fn log(&mut self, level: LogLevel, message: String, fields: String) {
        self.push_log(LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message,
            fields,
        });
    }

    /// Scrolls the log view one entry towards older entries.
    pub fn scroll_log_up(&mut self) {
        if self.log_scroll_offset + 1 < self.log_entries.len() {
            self.log_scroll_offset += 1;
        }
    }

    /// Scrolls the log view one entry towards the newest entry.
    pub fn scroll_log_down(&mut self) {
        self.log_scroll_offset = self.log_scroll_offset.saturating_sub(1);
    }
}
