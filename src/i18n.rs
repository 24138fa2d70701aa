//! # Module: Localization
//!
//! ## Responsibility
//! UI string tables for the two supported languages and locale-aware date and
//! time formatting. The backend can ship a string table per language
//! (`/static/lang/<code>.json`); entries from it override the built-in ones.
//!
//! ## Guarantees
//! - Every key has a German and an English built-in entry
//! - Times are formatted in the offset the backend sent them in, never shifted
//!   into the local timezone
//! - An unknown key renders as the key itself rather than failing

use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, FixedOffset, Locale, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// German, the default.
    #[default]
    De,
    /// English.
    En,
}

impl Language {
    /// Two-letter code used in preferences and language-pack URLs.
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Parses a two-letter code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" => Some(Self::De),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// The other language.
    pub fn toggled(self) -> Self {
        match self {
            Self::De => Self::En,
            Self::En => Self::De,
        }
    }

    /// Locale used for weekday and month names.
    pub fn locale(self) -> Locale {
        match self {
            Self::De => Locale::de_DE,
            Self::En => Locale::en_US,
        }
    }
}

/// Every key the dashboard renders through [`Strings`].
pub const KEYS: &[&str] = &[
    "title",
    "next_lesson",
    "current_lesson",
    "current_subject",
    "todays_lessons",
    "exams",
    "weather",
    "messages",
    "chat",
    "weekly",
    "log",
    "help",
    "calculating",
    "starts_in",
    "ends_in",
    "lesson_starting",
    "lesson_ended",
    "no_lesson",
    "no_notebook",
    "open_notebook",
    "no_upcoming_lessons",
    "no_lessons_today",
    "no_exams",
    "exam_badge",
    "loading",
    "snapshot",
    "timetable_error",
    "exams_error",
    "weather_error",
    "weekly_error",
    "chat_error",
    "messages_error",
    "feels_like",
    "humidity",
    "wind_speed",
    "login_prompt",
    "username",
    "password",
    "logged_in_as",
    "login_failed",
    "session_expired",
    "no_messages",
    "folder_dashboard",
    "folder_inbox",
    "folder_archive",
    "chat_placeholder",
    "search",
    "search_placeholder",
    "search_hint",
    "search_empty",
    "open_failed",
    "chat_thinking",
    "you",
    "assistant",
    "notifications_on",
    "notifications_off",
    "exam_in_days",
    "exam_tomorrow",
    "footer",
    "terminal_too_small",
];

fn builtin(language: Language, key: &str) -> Option<&'static str> {
    let text = match (language, key) {
        (Language::De, "title") => "Schul-Dashboard",
        (Language::En, "title") => "School Dashboard",
        (Language::De, "next_lesson") => "Nächste Lektion",
        (Language::En, "next_lesson") => "Next lesson",
        (Language::De, "current_lesson") => "Aktuelle Lektion",
        (Language::En, "current_lesson") => "Current lesson",
        (Language::De, "current_subject") => "Aktuelles Fach:",
        (Language::En, "current_subject") => "Current subject:",
        (Language::De, "todays_lessons") => "Heutige Lektionen",
        (Language::En, "todays_lessons") => "Today's lessons",
        (Language::De, "exams") => "Prüfungen",
        (Language::En, "exams") => "Exams",
        (Language::De, "weather") => "Wetter",
        (Language::En, "weather") => "Weather",
        (Language::De, "messages") => "ISY Mitteilungen",
        (Language::En, "messages") => "ISY messages",
        (Language::De, "chat") => "KI-Assistent",
        (Language::En, "chat") => "AI assistant",
        (Language::De, "weekly") => "Wochenplan",
        (Language::En, "weekly") => "Weekly schedule",
        (Language::De, "log") => "Protokoll",
        (Language::En, "log") => "Log",
        (Language::De, "help") => "Hilfe",
        (Language::En, "help") => "Help",
        (Language::De, "calculating") => "Berechne...",
        (Language::En, "calculating") => "Calculating...",
        (Language::De, "starts_in") => "Beginnt in ",
        (Language::En, "starts_in") => "Starts in ",
        (Language::De, "ends_in") => "Endet in ",
        (Language::En, "ends_in") => "Ends in ",
        (Language::De, "lesson_starting") => "Lektion beginnt jetzt!",
        (Language::En, "lesson_starting") => "Lesson starts now!",
        (Language::De, "lesson_ended") => "Lektion ist zu Ende!",
        (Language::En, "lesson_ended") => "Lesson is over!",
        (Language::De, "no_lesson") => "Gerade kein Unterricht",
        (Language::En, "no_lesson") => "No lesson right now",
        (Language::De, "no_notebook") => "Fach hat kein Notizbuch",
        (Language::En, "no_notebook") => "Subject has no notebook",
        (Language::De, "open_notebook") => "[b] Notizbuch öffnen",
        (Language::En, "open_notebook") => "[b] Open notebook",
        (Language::De, "no_upcoming_lessons") => "Keine kommenden Lektionen gefunden.",
        (Language::En, "no_upcoming_lessons") => "No upcoming lessons found.",
        (Language::De, "no_lessons_today") => "Keine Lektionen für heute.",
        (Language::En, "no_lessons_today") => "No lessons today.",
        (Language::De, "no_exams") => "Keine kommenden Prüfungen.",
        (Language::En, "no_exams") => "No upcoming exams.",
        (Language::De, "exam_badge") => "(Prüfung)",
        (Language::En, "exam_badge") => "(Exam)",
        (Language::De, "loading") => "Lade...",
        (Language::En, "loading") => "Loading...",
        (Language::De, "snapshot") => "Schnellansicht",
        (Language::En, "snapshot") => "Quick view",
        (Language::De, "timetable_error") => "Fehler beim Laden des Stundenplans",
        (Language::En, "timetable_error") => "Failed to load the timetable",
        (Language::De, "exams_error") => "Fehler beim Laden der Prüfungen",
        (Language::En, "exams_error") => "Failed to load exams",
        (Language::De, "weather_error") => "Fehler beim Laden der Wetterdaten",
        (Language::En, "weather_error") => "Failed to load weather data",
        (Language::De, "weekly_error") => "Fehler beim Laden des Wochenplans",
        (Language::En, "weekly_error") => "Failed to load the weekly schedule",
        (Language::De, "chat_error") => "Fehler beim Senden der Nachricht",
        (Language::En, "chat_error") => "Failed to send the message",
        (Language::De, "messages_error") => "Fehler beim Laden der Mitteilungen",
        (Language::En, "messages_error") => "Failed to load messages",
        (Language::De, "feels_like") => "Gefühlt",
        (Language::En, "feels_like") => "Feels like",
        (Language::De, "humidity") => "Luftfeuchtigkeit",
        (Language::En, "humidity") => "Humidity",
        (Language::De, "wind_speed") => "Windgeschwindigkeit",
        (Language::En, "wind_speed") => "Wind speed",
        (Language::De, "login_prompt") => "[i] bei ISY anmelden",
        (Language::En, "login_prompt") => "[i] log in to ISY",
        (Language::De, "username") => "Benutzername",
        (Language::En, "username") => "Username",
        (Language::De, "password") => "Passwort",
        (Language::En, "password") => "Password",
        (Language::De, "logged_in_as") => "Angemeldet als",
        (Language::En, "logged_in_as") => "Logged in as",
        (Language::De, "login_failed") => "Anmeldung fehlgeschlagen",
        (Language::En, "login_failed") => "Login failed",
        (Language::De, "session_expired") => "Sitzung abgelaufen, bitte erneut anmelden",
        (Language::En, "session_expired") => "Session expired, please log in again",
        (Language::De, "no_messages") => "Keine Mitteilungen.",
        (Language::En, "no_messages") => "No messages.",
        (Language::De, "folder_dashboard") => "Aktuell",
        (Language::En, "folder_dashboard") => "Recent",
        (Language::De, "folder_inbox") => "Posteingang",
        (Language::En, "folder_inbox") => "Inbox",
        (Language::De, "folder_archive") => "Archiv",
        (Language::En, "folder_archive") => "Archive",
        (Language::De, "chat_placeholder") => "[c] Frage stellen",
        (Language::En, "chat_placeholder") => "[c] ask a question",
        (Language::De, "search") => "Suche",
        (Language::En, "search") => "Search",
        (Language::De, "search_placeholder") => "[s] Im Web suchen",
        (Language::En, "search_placeholder") => "[s] search the web",
        (Language::De, "search_hint") => "[Tab] Suchmaschine  [Enter] Suchen",
        (Language::En, "search_hint") => "[Tab] engine  [Enter] search",
        (Language::De, "search_empty") => "Bitte geben Sie einen Suchbegriff ein.",
        (Language::En, "search_empty") => "Please enter a search term.",
        (Language::De, "open_failed") => "Konnte nicht geöffnet werden",
        (Language::En, "open_failed") => "Could not open",
        (Language::De, "chat_thinking") => "Denke nach...",
        (Language::En, "chat_thinking") => "Thinking...",
        (Language::De, "you") => "Du",
        (Language::En, "you") => "You",
        (Language::De, "assistant") => "KI",
        (Language::En, "assistant") => "AI",
        (Language::De, "notifications_on") => "Benachrichtigungen an",
        (Language::En, "notifications_on") => "Notifications on",
        (Language::De, "notifications_off") => "Benachrichtigungen aus",
        (Language::En, "notifications_off") => "Notifications off",
        (Language::De, "exam_in_days") => "Prüfung in {days} Tagen: {subject}",
        (Language::En, "exam_in_days") => "Exam in {days} days: {subject}",
        (Language::De, "exam_tomorrow") => "Prüfung morgen: {subject}",
        (Language::En, "exam_tomorrow") => "Exam tomorrow: {subject}",
        (Language::De, "footer") => {
            " [q]uit  [h]ilfe  [w]oche  [l]sprache  [n]otify  [r]efresh  [c]hat  [s]uche  [i]sy "
        }
        (Language::En, "footer") => {
            " [q]uit  [h]elp  [w]eek  [l]anguage  [n]otify  [r]efresh  [c]hat  [s]earch  [i]sy "
        }
        (Language::De, "terminal_too_small") => "Terminal zu klein, bitte vergrössern auf",
        (Language::En, "terminal_too_small") => "Terminal too small, resize to at least",
        _ => return None,
    };
    Some(text)
}

/// The active string table: built-in entries plus an optional backend pack.
#[derive(Debug, Clone, Default)]
pub struct Strings {
    language: Language,
    overrides: HashMap<String, String>,
}

impl Strings {
    /// Creates a table for `language` with built-in entries only.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            overrides: HashMap::new(),
        }
    }

    /// The language this table renders.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switches language and drops any pack loaded for the previous one.
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            self.overrides.clear();
        }
    }

    /// Merges a backend language pack. Packs for another language are ignored
    /// so a slow response cannot relabel the UI after a toggle.
    ///
    /// # Returns
    /// `true` if the pack was applied.
    pub fn apply_pack(&mut self, language: Language, pack: HashMap<String, String>) -> bool {
        if language != self.language {
            return false;
        }
        self.overrides.extend(pack);
        true
    }

    /// Looks up a key; unknown keys render as themselves.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.overrides
            .get(key)
            .map(String::as_str)
            .or_else(|| builtin(self.language, key))
            .unwrap_or(key)
    }

    /// Looks up a key and substitutes `{name}` placeholders.
    pub fn fill(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}

/// `HH:MM:SS` wall-clock time.
pub fn format_clock<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    dt.format("%H:%M:%S").to_string()
}

/// Long date, e.g. "Freitag, 14. November 2025" / "Friday, November 14, 2025".
pub fn format_long_date<Tz: TimeZone>(dt: &DateTime<Tz>, language: Language) -> String
where
    Tz::Offset: Display,
{
    let fmt = match language {
        Language::De => "%A, %-d. %B %Y",
        Language::En => "%A, %B %-d, %Y",
    };
    dt.format_localized(fmt, language.locale()).to_string()
}

/// Short date, e.g. "Fr., 14. Nov. 2025" / "Fri, Nov 14, 2025".
pub fn format_short_date<Tz: TimeZone>(dt: &DateTime<Tz>, language: Language) -> String
where
    Tz::Offset: Display,
{
    let fmt = match language {
        Language::De => "%a., %-d. %b. %Y",
        Language::En => "%a, %b %-d, %Y",
    };
    dt.format_localized(fmt, language.locale()).to_string()
}

/// Long date for a calendar day without a time component.
pub fn format_day(date: NaiveDate, language: Language) -> String {
    format_long_date(&date.and_time(NaiveTime::MIN).and_utc(), language)
}

/// `HH:MM` in the timestamp's own offset.
pub fn format_hm(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%H:%M").to_string()
}

/// `"08:00 - 08:45"`, or just `"08:00"` when the end is unknown.
pub fn time_range(start: &DateTime<FixedOffset>, end: Option<&DateTime<FixedOffset>>) -> String {
    match end {
        Some(end) => format!("{} - {}", format_hm(start), format_hm(end)),
        None => format_hm(start),
    }
}

/// Short date plus time range, e.g. "Fr., 14. Nov. 2025, 08:00 - 08:45".
pub fn format_time_window(
    start: &DateTime<FixedOffset>,
    end: Option<&DateTime<FixedOffset>>,
    language: Language,
) -> String {
    format!(
        "{}, {}",
        format_short_date(start, language),
        time_range(start, end)
    )
}
