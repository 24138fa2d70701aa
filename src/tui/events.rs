//! # Module: TUI Event Handling
//!
//! ## Responsibility
//! Polls crossterm events and translates keyboard input into app state
//! mutations. Keys that need the backend become a [`Command`] for the
//! coordinator; everything else (overlays, selection, text input) is applied
//! to `App` directly.
//!
//! ## Guarantees
//! - Non-blocking event polling with configurable timeout
//! - No panics on any key combination
//! - Ctrl+C always triggers quit, in every input mode

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, InputMode, Loadable};
use crate::api::types::MessageFolder;
use crate::coordinator::Command;
use crate::launch::SearchEngine;

/// Result of polling for a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Quit (q or Ctrl+C).
    Quit,
    /// Esc: cancel input or close the topmost overlay.
    Back,
    /// Toggle the help overlay.
    Help,
    /// Toggle the weekly schedule overlay.
    Weekly,
    /// Switch UI language.
    Language,
    /// Toggle exam reminders.
    Notifications,
    /// Refetch everything now.
    Refresh,
    /// Start typing a chat question.
    StartChat,
    /// Start typing a web search.
    StartSearch,
    /// Cycle the search engine while typing a search.
    NextEngine,
    /// Open the current lesson's notebook.
    OpenNotebook,
    /// Log in to ISY, or refresh messages when logged in.
    Isy,
    /// Log out of ISY.
    Logout,
    /// Cycle the message folder.
    NextFolder,
    /// Select the previous message.
    Up,
    /// Select the next message.
    Down,
    /// Open the selected message.
    Open,
    /// Archive the open or selected message.
    Archive,
    /// Scroll the log towards older entries.
    ScrollLogUp,
    /// Scroll the log towards newer entries.
    ScrollLogDown,
    /// A character typed into the input line.
    Char(char),
    /// Delete the last typed character.
    Backspace,
    /// Submit the input line.
    Submit,
    /// A terminal resize occurred.
    Resize(u16, u16),
    /// No actionable event within the poll window.
    None,
}

/// Polls for a single input event with the given timeout.
///
/// # Arguments
/// * `timeout` - Maximum time to wait for an event.
/// * `mode` - Current input mode; decides whether letters are shortcuts or text.
///
/// # Returns
/// The detected `InputEvent`, or `InputEvent::None` if no event occurred.
/// Crossterm polling errors also yield `InputEvent::None` (never panics).
pub fn poll_event(timeout: Duration, mode: InputMode) -> InputEvent {
    let available = match event::poll(timeout) {
        Ok(v) => v,
        Err(_) => return InputEvent::None,
    };
    if !available {
        return InputEvent::None;
    }

    match event::read() {
        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => translate_key(key, mode),
        Ok(Event::Resize(w, h)) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

/// Applies an input event to the app state.
///
/// # Arguments
/// * `app` - Mutable reference to app state.
/// * `event` - The input event to apply.
///
/// # Returns
/// A command for the coordinator, if the event needs the backend.
pub fn apply_event(app: &mut App, event: InputEvent) -> Option<Command> {
    match event {
        InputEvent::Quit => {
            app.should_quit = true;
            None
        }
        InputEvent::Back => {
            back(app);
            None
        }
        InputEvent::Help => {
            app.show_help = !app.show_help;
            None
        }
        InputEvent::Weekly => {
            if app.show_weekly {
                app.show_weekly = false;
                None
            } else {
                Some(Command::OpenWeekly)
            }
        }
        InputEvent::Language => Some(Command::ToggleLanguage),
        InputEvent::Notifications => Some(Command::ToggleNotifications),
        InputEvent::Refresh => Some(Command::RefreshAll),
        InputEvent::StartChat => {
            begin_input(app, InputMode::Chat);
            None
        }
        InputEvent::StartSearch => {
            begin_input(app, InputMode::Search);
            app.search_engine = SearchEngine::default();
            None
        }
        InputEvent::NextEngine => {
            if app.input_mode == InputMode::Search {
                app.search_engine = app.search_engine.next();
            }
            None
        }
        InputEvent::OpenNotebook => Some(Command::OpenNotebook),
        InputEvent::Isy => {
            if app.isy.logged_in {
                Some(Command::ShowMessages(app.isy.folder))
            } else {
                app.isy.login_error = None;
                begin_input(app, InputMode::LoginUser);
                None
            }
        }
        InputEvent::Logout => app.isy.logged_in.then_some(Command::Logout),
        InputEvent::NextFolder => app
            .isy
            .logged_in
            .then(|| Command::ShowMessages(app.isy.folder.next())),
        InputEvent::Up => {
            app.select_previous();
            None
        }
        InputEvent::Down => {
            app.select_next();
            None
        }
        InputEvent::Open => app.isy.selected_id().cloned().map(Command::OpenMessage),
        InputEvent::Archive => {
            if app.isy.folder == MessageFolder::Archive {
                return None;
            }
            let open = app
                .isy
                .open_message
                .as_ref()
                .and_then(Loadable::ready)
                .map(|m| m.id.clone());
            open.or_else(|| app.isy.selected_id().cloned())
                .map(Command::ArchiveMessage)
        }
        InputEvent::ScrollLogUp => {
            app.scroll_log_up();
            None
        }
        InputEvent::ScrollLogDown => {
            app.scroll_log_down();
            None
        }
        InputEvent::Char(c) => {
            app.input_buffer.push(c);
            None
        }
        InputEvent::Backspace => {
            app.input_buffer.pop();
            None
        }
        InputEvent::Submit => submit(app),
        InputEvent::Resize(_, _) | InputEvent::None => None,
    }
}

fn begin_input(app: &mut App, mode: InputMode) {
    app.input_mode = mode;
    app.input_buffer.clear();
}

fn back(app: &mut App) {
    if app.input_mode != InputMode::Normal {
        app.input_mode = InputMode::Normal;
        app.input_buffer.clear();
        app.isy.pending_username.clear();
    } else if app.show_help {
        app.show_help = false;
    } else if app.isy.open_message.is_some() {
        app.isy.open_message = None;
    } else if app.show_weekly {
        app.show_weekly = false;
    } else {
        app.should_quit = true;
    }
}

fn submit(app: &mut App) -> Option<Command> {
    let text = std::mem::take(&mut app.input_buffer);
    match app.input_mode {
        InputMode::Normal => None,
        InputMode::Chat => {
            app.input_mode = InputMode::Normal;
            let text = text.trim().to_string();
            (!text.is_empty()).then_some(Command::SendChat(text))
        }
        InputMode::LoginUser => {
            let username = text.trim().to_string();
            if username.is_empty() {
                return None;
            }
            app.isy.pending_username = username;
            app.input_mode = InputMode::LoginPassword;
            None
        }
        InputMode::LoginPassword => {
            app.input_mode = InputMode::Normal;
            let username = std::mem::take(&mut app.isy.pending_username);
            Some(Command::Login {
                username,
                password: text,
            })
        }
        InputMode::Search => {
            app.input_mode = InputMode::Normal;
            Some(Command::Search {
                engine: app.search_engine,
                query: text,
            })
        }
    }
}

/// Translates a crossterm key event to an `InputEvent`.
fn translate_key(key: KeyEvent, mode: InputMode) -> InputEvent {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return InputEvent::Quit;
    }

    if mode != InputMode::Normal {
        return match key.code {
            KeyCode::Esc => InputEvent::Back,
            KeyCode::Enter => InputEvent::Submit,
            KeyCode::Backspace => InputEvent::Backspace,
            KeyCode::Tab => InputEvent::NextEngine,
            KeyCode::Char(c) => InputEvent::Char(c),
            _ => InputEvent::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => InputEvent::Quit,
        KeyCode::Esc => InputEvent::Back,
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => InputEvent::Help,
        KeyCode::Char('w') | KeyCode::Char('W') => InputEvent::Weekly,
        KeyCode::Char('l') | KeyCode::Char('L') => InputEvent::Language,
        KeyCode::Char('n') | KeyCode::Char('N') => InputEvent::Notifications,
        KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Refresh,
        KeyCode::Char('c') | KeyCode::Char('C') => InputEvent::StartChat,
        KeyCode::Char('s') | KeyCode::Char('S') => InputEvent::StartSearch,
        KeyCode::Char('b') | KeyCode::Char('B') => InputEvent::OpenNotebook,
        KeyCode::Char('i') | KeyCode::Char('I') => InputEvent::Isy,
        KeyCode::Char('o') | KeyCode::Char('O') => InputEvent::Logout,
        KeyCode::Char('m') | KeyCode::Char('M') => InputEvent::NextFolder,
        KeyCode::Char('a') | KeyCode::Char('A') => InputEvent::Archive,
        KeyCode::Enter => InputEvent::Open,
        KeyCode::Up => InputEvent::Up,
        KeyCode::Down => InputEvent::Down,
        KeyCode::PageUp => InputEvent::ScrollLogUp,
        KeyCode::PageDown => InputEvent::ScrollLogDown,
        _ => InputEvent::None,
    }
}
