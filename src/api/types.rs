//! Wire types for the dashboard backend.
//!
//! Field names follow the backend's JSON exactly. Timestamps are ISO 8601
//! with offset and are kept as [`DateTime<FixedOffset>`] so the wall-clock
//! time the backend chose is displayed unchanged.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// `GET /api/timetable?mode=auto` and `/static/fast_timetable.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimetableResponse {
    /// The lesson running right now.
    #[serde(default)]
    pub current_lesson: Option<CurrentLesson>,
    /// The next lesson to start.
    #[serde(default)]
    pub next_lesson: Option<Lesson>,
    /// All of today's lessons in order.
    #[serde(default)]
    pub todays_lessons: Vec<Lesson>,
    /// Upcoming exams.
    #[serde(default)]
    pub exams: Vec<Lesson>,
    /// Backend notice that replaces the next-lesson panel (e.g. no timetable).
    #[serde(default)]
    pub message: Option<String>,
}

/// A scheduled lesson or exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Calendar summary, usually "Subject - Teacher".
    pub summary: String,
    /// Start instant with the backend's offset.
    pub start: DateTime<FixedOffset>,
    /// End instant, if known.
    #[serde(default)]
    pub end: Option<DateTime<FixedOffset>>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Room.
    #[serde(default)]
    pub location: Option<String>,
    /// Change notice such as "Verschoben" or "Raumwechsel".
    #[serde(default)]
    pub special_note: Option<String>,
    /// Whether the lesson was cancelled.
    #[serde(default)]
    pub is_cancelled: bool,
    /// Whether the lesson is an exam.
    #[serde(default)]
    pub is_exam: bool,
}

/// How a special note should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    /// Lesson does not take place.
    Cancelled,
    /// Lesson was moved to another time.
    Moved,
    /// Lesson takes place in another room.
    RoomChange,
}

impl Lesson {
    /// Subject part of the summary: everything before the first `-` or `–`.
    pub fn subject(&self) -> &str {
        self.summary
            .split(['-', '\u{2013}'])
            .next()
            .unwrap_or_default()
            .trim()
    }

    /// Description, treating an empty string as absent.
    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    /// Location, treating an empty string as absent.
    pub fn location(&self) -> Option<&str> {
        non_empty(self.location.as_deref())
    }

    /// Special note, treating an empty string as absent.
    pub fn special_note(&self) -> Option<&str> {
        non_empty(self.special_note.as_deref())
    }

    /// Badge kind for a lesson's special note. Unrecognised notes are
    /// cancellations.
    pub fn lesson_note_kind(&self) -> Option<NoteKind> {
        self.special_note().map(|note| {
            if note.contains("Verschoben") {
                NoteKind::Moved
            } else if note.contains("Raumwechsel") {
                NoteKind::RoomChange
            } else {
                NoteKind::Cancelled
            }
        })
    }

    /// Badge kind for an exam's special note. Unrecognised notes are moves.
    pub fn exam_note_kind(&self) -> Option<NoteKind> {
        self.special_note().map(|note| {
            if note.contains("Raumwechsel") {
                NoteKind::RoomChange
            } else {
                NoteKind::Moved
            }
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The lesson in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentLesson {
    /// Subject name.
    pub subject: String,
    /// Start instant, if the backend sends it.
    #[serde(default)]
    pub start: Option<DateTime<FixedOffset>>,
    /// End instant.
    #[serde(default)]
    pub end: Option<DateTime<FixedOffset>>,
    /// OneNote notebook link for the subject.
    #[serde(default)]
    pub onenote_link: Option<String>,
}

impl CurrentLesson {
    /// Notebook link, treating an empty string as absent.
    pub fn notebook(&self) -> Option<&str> {
        non_empty(self.onenote_link.as_deref())
    }
}

/// `GET /api/weekly?mode=auto`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyResponse {
    /// One entry per day.
    #[serde(default)]
    pub weekly_schedule: Vec<WeeklyDay>,
    /// Backend notice shown instead of the schedule.
    #[serde(default)]
    pub message: Option<String>,
}

/// One day of the weekly schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDay {
    /// Calendar day (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Lessons on that day.
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// `GET /api/weather`, success and error bodies alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherResponse {
    /// Temperature in °C.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Apparent temperature in °C.
    #[serde(default)]
    pub feels_like: Option<f64>,
    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Wind speed in m/s.
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// OpenWeather icon code, e.g. "04d".
    #[serde(default)]
    pub icon: Option<String>,
    /// Localized condition text.
    #[serde(default)]
    pub description: Option<String>,
    /// Error headline when the backend could not fetch weather.
    #[serde(default)]
    pub error: Option<String>,
    /// Error detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// Current conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    /// Temperature in °C.
    pub temperature: f64,
    /// Apparent temperature in °C.
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Wind speed in m/s.
    pub wind_speed: f64,
    /// OpenWeather icon code.
    pub icon: String,
    /// Condition text.
    pub description: String,
}

/// What the weather widget shows.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    /// Conditions are available.
    Conditions(Weather),
    /// The backend reported an error.
    Unavailable {
        /// Error headline.
        error: String,
        /// Optional detail line.
        detail: Option<String>,
    },
}

impl WeatherResponse {
    /// Interprets the body. An `error` field wins over any measurements.
    ///
    /// # Returns
    /// `None` if the body has neither an error nor a temperature.
    pub fn into_report(self) -> Option<WeatherReport> {
        if let Some(error) = self.error {
            return Some(WeatherReport::Unavailable {
                error,
                detail: self.message,
            });
        }
        let temperature = self.temperature?;
        Some(WeatherReport::Conditions(Weather {
            temperature,
            feels_like: self.feels_like.unwrap_or(temperature),
            humidity: self.humidity.unwrap_or_default(),
            wind_speed: self.wind_speed.unwrap_or_default(),
            icon: self.icon.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
        }))
    }
}

/// Speaker of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The dashboard user.
    User,
    /// The AI backend.
    Assistant,
}

/// One turn of the chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke.
    pub role: ChatRole,
    /// What was said.
    pub content: String,
}

/// `POST /api/ai/chat` body.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// The new user message.
    pub message: &'a str,
    /// Prior turns, oldest first.
    pub history: &'a [ChatTurn],
}

/// `POST /api/ai/chat` reply.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply.
    #[serde(default)]
    pub response: Option<String>,
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
}

/// ISY message identifier. The backend sends either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawMessageId", into = "String")]
pub struct MessageId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMessageId {
    Number(u64),
    Text(String),
}

impl From<RawMessageId> for MessageId {
    fn from(raw: RawMessageId) -> Self {
        match raw {
            RawMessageId::Number(n) => Self(n.to_string()),
            RawMessageId::Text(s) => Self(s),
        }
    }
}

impl From<MessageId> for String {
    fn from(id: MessageId) -> Self {
        id.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `GET /api/isy/status`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct IsyStatus {
    /// Whether the backend holds a live ISY session.
    #[serde(default)]
    pub logged_in: bool,
    /// Account name.
    #[serde(default)]
    pub username: Option<String>,
}

/// `POST /api/isy/login` body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Account name.
    pub username: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Generic acknowledgement for login, logout and archive calls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AckResponse {
    /// Whether the action succeeded.
    #[serde(default)]
    pub success: bool,
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
    /// Session expired.
    #[serde(default)]
    pub login_required: bool,
}

/// `POST /api/isy/archive-message` body.
#[derive(Debug, Serialize)]
pub struct ArchiveRequest<'a> {
    /// Message to archive.
    pub id: &'a MessageId,
}

/// A message in a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageSummary {
    /// Identifier for detail and archive calls.
    pub id: MessageId,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Sender.
    #[serde(default)]
    pub sender: Option<String>,
    /// Date as sent by ISY.
    #[serde(default)]
    pub date: Option<String>,
    /// Whether the message was read.
    #[serde(default)]
    pub read: bool,
}

/// `GET /api/isy/messages`, `/dashboard-messages`, `/archive-messages`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MessagesResponse {
    /// Messages, newest first.
    #[serde(default)]
    pub messages: Vec<MessageSummary>,
    /// Session expired.
    #[serde(default)]
    pub login_required: bool,
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
}

/// Full message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageDetail {
    /// Identifier.
    pub id: MessageId,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Sender.
    #[serde(default)]
    pub sender: Option<String>,
    /// Date as sent by ISY.
    #[serde(default)]
    pub date: Option<String>,
    /// Plain-text body.
    #[serde(default)]
    pub body: Option<String>,
}

/// `GET /api/isy/message/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MessageDetailResponse {
    /// The message.
    #[serde(default)]
    pub message: Option<MessageDetail>,
    /// Session expired.
    #[serde(default)]
    pub login_required: bool,
    /// Error text.
    #[serde(default)]
    pub error: Option<String>,
}

/// Which ISY message list to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageFolder {
    /// Recent messages shown on the dashboard.
    #[default]
    Dashboard,
    /// Full inbox.
    Inbox,
    /// Archived messages.
    Archive,
}

impl MessageFolder {
    /// Endpoint path for this folder.
    pub fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/api/isy/dashboard-messages",
            Self::Inbox => "/api/isy/messages",
            Self::Archive => "/api/isy/archive-messages",
        }
    }

    /// The next folder in display order.
    pub fn next(self) -> Self {
        match self {
            Self::Dashboard => Self::Inbox,
            Self::Inbox => Self::Archive,
            Self::Archive => Self::Dashboard,
        }
    }

    /// String-table key for the folder label.
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Dashboard => "folder_dashboard",
            Self::Inbox => "folder_inbox",
            Self::Archive => "folder_archive",
        }
    }
}

/// `GET /static/lang/:lang.json`.
pub type LanguagePack = HashMap<String, String>;
