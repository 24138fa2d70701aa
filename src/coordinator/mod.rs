//! # Module: Refresh Coordinator
//!
//! ## Responsibility
//! Decide what to fetch and when, and apply what comes back. The coordinator
//! owns the scheduler, the lesson boundary watcher, the per-feed sequence
//! guard and the exam reminder record. It never performs I/O itself: every
//! method returns the [`FetchRequest`]s the caller must dispatch.
//!
//! ## Guarantees
//! - One timetable request per tick at most, however many triggers fired
//! - A result older than one already applied for its feed is discarded
//! - A failed fetch only changes the widget it belongs to
//! - `login_required` from any ISY call clears the local session
//!
//! ## NOT Responsible For
//! - Network transport (see [`dispatch`])
//! - Rendering (see `tui::ui`)

pub mod boundary;
pub mod countdown;
pub mod dispatch;
pub mod exams;
pub mod scheduler;
pub mod sequence;

use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::types::{
    ChatRole, ChatTurn, IsyStatus, LanguagePack, MessageDetail, MessageFolder, MessageId,
    MessageSummary, TimetableResponse, WeatherReport, WeeklyResponse,
};
use crate::api::TimetableSource;
use crate::config::{DashboardConfig, RefreshConfig};
use crate::i18n::Language;
use crate::launch::SearchEngine;
use crate::tui::app::{App, InputMode, Loadable, LogLevel};
use crate::DashboardError;

use boundary::{BoundaryWatcher, LessonWindow};
use countdown::{Countdown, CountdownKind};
use exams::{ExamNotification, ExamNotifier};
use scheduler::{Scheduler, TaskName};
use sequence::{Feed, Sequencer};

pub use dispatch::Dispatcher;

/// A backend call the UI loop must start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Timetable from the snapshot or the live endpoint.
    Timetable {
        /// Sequence number for the timetable feed.
        seq: u64,
        /// Endpoint to use.
        source: TimetableSource,
    },
    /// Weekly schedule.
    Weekly {
        /// Sequence number for the weekly feed.
        seq: u64,
    },
    /// Current weather.
    Weather {
        /// Sequence number for the weather feed.
        seq: u64,
    },
    /// Backend string table.
    Language {
        /// Language to fetch.
        language: Language,
    },
    /// Chat question.
    Chat {
        /// The question.
        message: String,
        /// Completed turns before it.
        history: Vec<ChatTurn>,
    },
    /// ISY session state.
    IsyStatus,
    /// ISY login.
    IsyLogin {
        /// Account name.
        username: String,
        /// Password.
        password: String,
    },
    /// ISY logout.
    IsyLogout,
    /// ISY message list.
    IsyMessages {
        /// Sequence number for the message list feed.
        seq: u64,
        /// Folder to list.
        folder: MessageFolder,
    },
    /// One ISY message.
    IsyMessage {
        /// Sequence number for the detail feed.
        seq: u64,
        /// Message to open.
        id: MessageId,
    },
    /// Archive one ISY message.
    IsyArchive {
        /// Message to archive.
        id: MessageId,
    },
    /// Hand a URL or notebook link to the system handler.
    OpenUrl {
        /// What to open.
        url: String,
    },
}

/// Result of a [`FetchRequest`], sent back to the UI loop.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Timetable result.
    Timetable {
        /// Sequence number of the request.
        seq: u64,
        /// Endpoint used.
        source: TimetableSource,
        /// Body or error.
        result: Result<TimetableResponse, DashboardError>,
    },
    /// Weekly schedule result.
    Weekly {
        /// Sequence number of the request.
        seq: u64,
        /// Body or error.
        result: Result<WeeklyResponse, DashboardError>,
    },
    /// Weather result.
    Weather {
        /// Sequence number of the request.
        seq: u64,
        /// Report or error.
        result: Result<WeatherReport, DashboardError>,
    },
    /// String table result.
    Language {
        /// Language requested.
        language: Language,
        /// Table or error.
        result: Result<LanguagePack, DashboardError>,
    },
    /// Chat reply.
    Chat {
        /// The question that was sent.
        message: String,
        /// Reply or error.
        result: Result<String, DashboardError>,
    },
    /// ISY session state.
    IsyStatus(Result<IsyStatus, DashboardError>),
    /// ISY login result.
    IsyLogin {
        /// Account name used.
        username: String,
        /// Success or error.
        result: Result<(), DashboardError>,
    },
    /// ISY logout result.
    IsyLogout(Result<(), DashboardError>),
    /// ISY message list.
    IsyMessages {
        /// Sequence number of the request.
        seq: u64,
        /// Folder listed.
        folder: MessageFolder,
        /// Messages or error.
        result: Result<Vec<MessageSummary>, DashboardError>,
    },
    /// ISY message detail.
    IsyMessage {
        /// Sequence number of the request.
        seq: u64,
        /// Message or error.
        result: Result<MessageDetail, DashboardError>,
    },
    /// ISY archive result.
    IsyArchive {
        /// Message archived.
        id: MessageId,
        /// Success or error.
        result: Result<(), DashboardError>,
    },
    /// System handler launch result.
    Opened {
        /// What was opened.
        url: String,
        /// Success or error.
        result: Result<(), DashboardError>,
    },
}

/// User intents that need the coordinator (anything beyond pure UI state).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Refetch timetable, weather and messages now.
    RefreshAll,
    /// Open the weekly overlay and fetch the schedule.
    OpenWeekly,
    /// Switch between German and English.
    ToggleLanguage,
    /// Turn exam reminders on or off.
    ToggleNotifications,
    /// Ask the AI assistant.
    SendChat(String),
    /// Log in to ISY.
    Login {
        /// Account name.
        username: String,
        /// Password.
        password: String,
    },
    /// Log out of ISY.
    Logout,
    /// Show (and refetch) a message folder.
    ShowMessages(MessageFolder),
    /// Open a message.
    OpenMessage(MessageId),
    /// Archive a message.
    ArchiveMessage(MessageId),
    /// Run a web search in the browser.
    Search {
        /// Provider to query.
        engine: SearchEngine,
        /// Text typed into the search bar.
        query: String,
    },
    /// Open the current lesson's OneNote notebook.
    OpenNotebook,
}

/// Scheduling and result application for the dashboard.
#[derive(Debug)]
pub struct Coordinator {
    refresh: RefreshConfig,
    scheduler: Scheduler,
    sequencer: Sequencer,
    boundary: BoundaryWatcher,
    exams: ExamNotifier,
}

impl Coordinator {
    /// Creates a coordinator from configuration. Nothing is scheduled until
    /// [`Coordinator::start`].
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            refresh: config.refresh.clone(),
            scheduler: Scheduler::new(),
            sequencer: Sequencer::new(),
            boundary: BoundaryWatcher::new(),
            exams: ExamNotifier::new(config.notifications.thresholds_days.clone()),
        }
    }

    /// The task table (read-only).
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// The lesson windows being watched (read-only).
    pub fn boundary(&self) -> &BoundaryWatcher {
        &self.boundary
    }

    /// Starts every recurring task and returns the initial fetches.
    ///
    /// With fast load enabled the snapshot is fetched first and a one-shot
    /// live fetch is scheduled after `full_load_delay`; otherwise the live
    /// timetable is fetched directly. Calling `start` twice schedules nothing
    /// new.
    pub fn start(&mut self, now: Instant, app: &App) -> Vec<FetchRequest> {
        let tick = self.refresh.tick();
        let boundary = self.refresh.boundary_watch();
        let timetable = self.refresh.timetable_poll();
        let weather = self.refresh.weather_poll();

        if !self.scheduler.start_now(TaskName::Tick, tick, now) {
            return Vec::new();
        }
        self.scheduler.start(TaskName::BoundaryWatch, boundary, now);
        self.scheduler.start(TaskName::TimetablePoll, timetable, now);
        self.scheduler.start(TaskName::WeatherPoll, weather, now);

        let source = if self.refresh.fast_load {
            self.scheduler
                .start_once(TaskName::FullLoad, self.refresh.full_load_delay(), now);
            TimetableSource::Snapshot
        } else {
            TimetableSource::Live
        };
        info!(?source, tasks = self.scheduler.len(), "refresh schedule started");

        vec![
            self.timetable_request(source),
            self.weather_request(),
            FetchRequest::Language {
                language: app.language(),
            },
            FetchRequest::IsyStatus,
        ]
    }

    /// Stops every task.
    pub fn stop(&mut self) {
        for name in [
            TaskName::Tick,
            TaskName::BoundaryWatch,
            TaskName::TimetablePoll,
            TaskName::WeatherPoll,
            TaskName::FullLoad,
        ] {
            self.scheduler.stop(name);
        }
    }

    /// Runs every task due at `now`.
    ///
    /// # Arguments
    /// * `now` - Monotonic time for scheduling.
    /// * `wall` - Wall time for the clock, countdowns and boundaries.
    /// * `app` - State to update.
    pub fn tick(&mut self, now: Instant, wall: DateTime<Utc>, app: &mut App) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        let mut refetch_timetable = false;

        for task in self.scheduler.due(now) {
            match task {
                TaskName::Tick => app.on_tick(wall),
                TaskName::BoundaryWatch => {
                    let check = self.boundary.check(wall);
                    if check.needs_refetch() {
                        info!(
                            next_started = check.next_started,
                            current_ended = check.current_ended,
                            "lesson boundary crossed"
                        );
                        refetch_timetable = true;
                    }
                }
                TaskName::TimetablePoll | TaskName::FullLoad => refetch_timetable = true,
                TaskName::WeatherPoll => requests.push(self.weather_request()),
            }
        }

        if refetch_timetable {
            requests.push(self.timetable_request(TimetableSource::Live));
        }
        requests
    }

    /// Turns a user command into state changes and fetches.
    pub fn handle(&mut self, command: Command, app: &mut App, wall: DateTime<Utc>) -> Vec<FetchRequest> {
        match command {
            Command::RefreshAll => {
                let mut requests = vec![
                    self.timetable_request(TimetableSource::Live),
                    self.weather_request(),
                ];
                if app.isy.logged_in {
                    requests.push(self.messages_request(app.isy.folder));
                }
                requests
            }
            Command::OpenWeekly => {
                app.show_weekly = true;
                app.weekly = Loadable::Loading;
                vec![FetchRequest::Weekly {
                    seq: self.sequencer.issue(Feed::Weekly),
                }]
            }
            Command::ToggleLanguage => {
                let language = app.language().toggled();
                app.set_language(language);
                info!(language = language.code(), "language changed");
                vec![FetchRequest::Language { language }]
            }
            Command::ToggleNotifications => {
                if app.toggle_notifications() {
                    if let Some(timetable) = app.timetable.ready() {
                        let fired = self.exams.check(&timetable.exams, wall);
                        notify_exams(app, fired);
                    }
                }
                Vec::new()
            }
            Command::SendChat(message) => {
                let message = message.trim().to_string();
                if message.is_empty() || app.chat.pending.is_some() {
                    return Vec::new();
                }
                app.chat.pending = Some(message.clone());
                app.chat.error = None;
                vec![FetchRequest::Chat {
                    message,
                    history: app.chat.history.clone(),
                }]
            }
            Command::Login { username, password } => {
                app.isy.login_error = None;
                vec![FetchRequest::IsyLogin { username, password }]
            }
            Command::Logout => vec![FetchRequest::IsyLogout],
            Command::ShowMessages(folder) => {
                if !app.isy.logged_in {
                    return Vec::new();
                }
                if app.isy.folder != folder {
                    app.isy.selected = 0;
                }
                app.isy.folder = folder;
                app.isy.messages = Loadable::Loading;
                vec![self.messages_request(folder)]
            }
            Command::OpenMessage(id) => {
                app.isy.open_message = Some(Loadable::Loading);
                vec![FetchRequest::IsyMessage {
                    seq: self.sequencer.issue(Feed::IsyDetail),
                    id,
                }]
            }
            Command::ArchiveMessage(id) => vec![FetchRequest::IsyArchive { id }],
            Command::Search { engine, query } => match engine.search_url(&query) {
                Some(url) => {
                    info!(engine = engine.label(), "web search");
                    vec![FetchRequest::OpenUrl { url }]
                }
                None => {
                    let text = app.strings.get("search_empty").to_string();
                    app.push_notice(text);
                    Vec::new()
                }
            },
            Command::OpenNotebook => {
                let Some(current) = app.timetable.ready().and_then(|t| t.current_lesson.as_ref()) else {
                    return Vec::new();
                };
                match current.notebook() {
                    Some(link) => {
                        info!(subject = %current.subject, "opening notebook");
                        vec![FetchRequest::OpenUrl {
                            url: link.to_string(),
                        }]
                    }
                    None => {
                        let text = app.strings.get("no_notebook").to_string();
                        app.push_notice(text);
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Applies a fetch result to `app`.
    ///
    /// # Returns
    /// Follow-up fetches, e.g. the message list after a login.
    pub fn apply(&mut self, outcome: FetchOutcome, app: &mut App, wall: DateTime<Utc>) -> Vec<FetchRequest> {
        match outcome {
            FetchOutcome::Timetable {
                seq,
                source,
                result,
            } => {
                if !self.accept(Feed::Timetable, seq) {
                    return Vec::new();
                }
                match result {
                    Ok(timetable) => self.apply_timetable(timetable, source, app, wall),
                    Err(e) => {
                        let text = error_line(app, "timetable_error", &e);
                        warn!(error = %e, ?source, "timetable fetch failed");
                        app.log(LogLevel::Error, text, String::new());
                        app.timetable = Loadable::Failed(e.to_string());
                    }
                }
                Vec::new()
            }
            FetchOutcome::Weekly { seq, result } => {
                if self.accept(Feed::Weekly, seq) {
                    app.weekly = match result {
                        Ok(weekly) => Loadable::Ready(weekly),
                        Err(e) => {
                            warn!(error = %e, "weekly fetch failed");
                            Loadable::Failed(e.to_string())
                        }
                    };
                }
                Vec::new()
            }
            FetchOutcome::Weather { seq, result } => {
                if !self.accept(Feed::Weather, seq) {
                    return Vec::new();
                }
                match result {
                    Ok(report) => {
                        if let WeatherReport::Unavailable { error, .. } = &report {
                            warn!(%error, "weather unavailable");
                            app.log(LogLevel::Warn, error.clone(), String::new());
                        }
                        app.weather = Loadable::Ready(report);
                    }
                    Err(e) => {
                        let text = error_line(app, "weather_error", &e);
                        warn!(error = %e, "weather fetch failed");
                        app.log(LogLevel::Error, text, String::new());
                        app.weather = Loadable::Failed(e.to_string());
                    }
                }
                Vec::new()
            }
            FetchOutcome::Language { language, result } => {
                match result {
                    Ok(pack) => {
                        let entries = pack.len();
                        if app.strings.apply_pack(language, pack) {
                            debug!(language = language.code(), entries, "language pack applied");
                        }
                    }
                    Err(e) => {
                        debug!(language = language.code(), error = %e, "language pack unavailable, using built-in strings");
                    }
                }
                Vec::new()
            }
            FetchOutcome::Chat { message, result } => {
                app.chat.pending = None;
                match result {
                    Ok(reply) => {
                        app.chat.history.push(ChatTurn {
                            role: ChatRole::User,
                            content: message,
                        });
                        app.chat.history.push(ChatTurn {
                            role: ChatRole::Assistant,
                            content: reply,
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "chat failed");
                        app.chat.error = Some(e.to_string());
                    }
                }
                Vec::new()
            }
            FetchOutcome::IsyStatus(result) => match result {
                Ok(status) => {
                    app.isy.logged_in = status.logged_in;
                    app.isy.username = status.username;
                    if status.logged_in {
                        app.isy.messages = Loadable::Loading;
                        vec![self.messages_request(app.isy.folder)]
                    } else {
                        Vec::new()
                    }
                }
                Err(e) => {
                    debug!(error = %e, "isy status unavailable");
                    Vec::new()
                }
            },
            FetchOutcome::IsyLogin { username, result } => match result {
                Ok(()) => {
                    info!(%username, "isy login succeeded");
                    app.isy.logged_in = true;
                    app.isy.username = Some(username);
                    app.isy.login_error = None;
                    app.isy.folder = MessageFolder::Dashboard;
                    app.isy.selected = 0;
                    app.isy.messages = Loadable::Loading;
                    vec![self.messages_request(MessageFolder::Dashboard)]
                }
                Err(e) => {
                    warn!(%username, error = %e, "isy login failed");
                    app.isy.login_error = Some(e.to_string());
                    Vec::new()
                }
            },
            FetchOutcome::IsyLogout(result) => {
                if let Err(e) = &result {
                    warn!(error = %e, "isy logout failed");
                    app.log(LogLevel::Warn, e.to_string(), String::new());
                }
                app.isy = Default::default();
                if app.input_mode != InputMode::Normal {
                    app.input_mode = InputMode::Normal;
                    app.input_buffer.clear();
                }
                Vec::new()
            }
            FetchOutcome::IsyMessages {
                seq,
                folder,
                result,
            } => {
                if !self.accept(Feed::IsyMessages, seq) {
                    return Vec::new();
                }
                match result {
                    Ok(messages) => {
                        app.isy.selected = app.isy.selected.min(messages.len().saturating_sub(1));
                        app.isy.folder = folder;
                        app.isy.messages = Loadable::Ready(messages);
                    }
                    Err(e) if e.is_login_required() => app.clear_isy_session(),
                    Err(e) => {
                        warn!(error = %e, ?folder, "isy messages failed");
                        app.isy.messages = Loadable::Failed(e.to_string());
                    }
                }
                Vec::new()
            }
            FetchOutcome::IsyMessage { seq, result } => {
                if !self.accept(Feed::IsyDetail, seq) {
                    return Vec::new();
                }
                // Closed while loading.
                if app.isy.open_message.is_none() {
                    return Vec::new();
                }
                match result {
                    Ok(detail) => app.isy.open_message = Some(Loadable::Ready(detail)),
                    Err(e) if e.is_login_required() => app.clear_isy_session(),
                    Err(e) => {
                        warn!(error = %e, "isy message failed");
                        app.isy.open_message = Some(Loadable::Failed(e.to_string()));
                    }
                }
                Vec::new()
            }
            FetchOutcome::IsyArchive { id, result } => match result {
                Ok(()) => {
                    info!(%id, "message archived");
                    let open_id = app
                        .isy
                        .open_message
                        .as_ref()
                        .and_then(Loadable::ready)
                        .map(|m| &m.id);
                    if open_id == Some(&id) {
                        app.isy.open_message = None;
                    }
                    app.isy.messages = Loadable::Loading;
                    vec![self.messages_request(app.isy.folder)]
                }
                Err(e) if e.is_login_required() => {
                    app.clear_isy_session();
                    Vec::new()
                }
                Err(e) => {
                    warn!(%id, error = %e, "archive failed");
                    let text = error_line(app, "messages_error", &e);
                    app.log(LogLevel::Error, text.clone(), String::new());
                    app.push_notice(text);
                    Vec::new()
                }
            },
            FetchOutcome::Opened { url, result } => {
                match result {
                    Ok(()) => debug!(%url, "opened"),
                    Err(e) => {
                        warn!(error = %e, "open failed");
                        let text = error_line(app, "open_failed", &e);
                        app.log(LogLevel::Error, text, String::new());
                    }
                }
                Vec::new()
            }
        }
    }

    fn apply_timetable(
        &mut self,
        timetable: TimetableResponse,
        source: TimetableSource,
        app: &mut App,
        wall: DateTime<Utc>,
    ) {
        // A backend notice replaces the next lesson entirely.
        let next = if timetable.message.is_some() {
            None
        } else {
            timetable.next_lesson.as_ref().map(|lesson| LessonWindow {
                start: lesson.start.with_timezone(&Utc),
                end: lesson.end.map(|e| e.with_timezone(&Utc)),
            })
        };
        let current = timetable.current_lesson.as_ref().map(|lesson| LessonWindow {
            start: lesson.start.map_or(wall, |s| s.with_timezone(&Utc)),
            end: lesson.end.map(|e| e.with_timezone(&Utc)),
        });
        self.boundary.set_windows(next, current);

        let next_countdown = next.map(|w| Countdown::new(CountdownKind::LessonStart, w.start));
        let current_countdown = current
            .and_then(|w| w.end)
            .map(|end| Countdown::new(CountdownKind::LessonEnd, end));
        app.set_countdowns(next_countdown, current_countdown, wall);

        if app.prefs.notifications {
            let fired = self.exams.check(&timetable.exams, wall);
            notify_exams(app, fired);
        }

        debug!(
            ?source,
            todays = timetable.todays_lessons.len(),
            exams = timetable.exams.len(),
            "timetable applied"
        );
        app.timetable_source = Some(source);
        app.timetable = Loadable::Ready(timetable);
    }

    fn accept(&mut self, feed: Feed, seq: u64) -> bool {
        let accepted = self.sequencer.accept(feed, seq);
        if !accepted {
            debug!(
                ?feed,
                seq,
                last = self.sequencer.last_applied(feed),
                "stale result discarded"
            );
        }
        accepted
    }

    fn timetable_request(&mut self, source: TimetableSource) -> FetchRequest {
        FetchRequest::Timetable {
            seq: self.sequencer.issue(Feed::Timetable),
            source,
        }
    }

    fn weather_request(&mut self) -> FetchRequest {
        FetchRequest::Weather {
            seq: self.sequencer.issue(Feed::Weather),
        }
    }

    fn messages_request(&mut self, folder: MessageFolder) -> FetchRequest {
        FetchRequest::IsyMessages {
            seq: self.sequencer.issue(Feed::IsyMessages),
            folder,
        }
    }
}

/// `"<localized prefix>: <error>"`, e.g. "Fehler beim Laden des Stundenplans: HTTP 500 von /api/timetable".
fn error_line(app: &App, key: &str, error: &DashboardError) -> String {
    format!("{}: {error}", app.strings.get(key))
}

fn notify_exams(app: &mut App, fired: Vec<ExamNotification>) {
    for exam in fired {
        let days = exam.days.to_string();
        let text = if exam.days == 1 {
            app.strings.fill("exam_tomorrow", &[("subject", &exam.subject)])
        } else {
            app.strings
                .fill("exam_in_days", &[("days", &days), ("subject", &exam.subject)])
        };
        info!(subject = %exam.subject, days = exam.days, "exam reminder");
        app.log(LogLevel::Info, text.clone(), String::new());
        app.push_notice(text);
    }
}
