//! # Module: TUI Widgets
//!
//! ## Responsibility
//! Individual rendering widgets for each dashboard section. Each widget has a
//! pure line builder over `App` state (tested directly) and a `render`
//! function that places those lines into a frame.
//!
//! ## Guarantees
//! - All widgets handle loading, failed and empty states
//! - No widget panics on any input
//! - Badge and error colors are consistent across widgets

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::api::types::NoteKind;
use crate::tui::app::{App, Loadable};

pub mod chat;
pub mod clock;
pub mod exams;
pub mod lessons;
pub mod log;
pub mod messages;
pub mod search;
pub mod weather;
pub mod weekly;

/// Plain text of a line, spans concatenated.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

/// Lines for a widget whose data is not ready.
///
/// # Returns
/// `None` when `data` is ready and the widget should render it.
pub fn placeholder<T>(app: &App, data: &Loadable<T>, error_key: &str) -> Option<Vec<Line<'static>>> {
    match data {
        Loadable::Ready(_) => None,
        Loadable::Idle | Loadable::Loading => Some(vec![muted(app.strings.get("loading"))]),
        Loadable::Failed(detail) => Some(vec![error_line(app, error_key, detail)]),
    }
}

/// `"<headline>: <detail>"` in red.
pub fn error_line(app: &App, key: &str, detail: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}: {detail}", app.strings.get(key)),
        Style::default().fg(Color::Red),
    ))
}

/// Gray informational line.
pub fn muted(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Highlight color for a special note.
pub fn note_color(kind: NoteKind) -> Color {
    match kind {
        NoteKind::Cancelled => Color::Red,
        NoteKind::Moved => Color::Yellow,
        NoteKind::RoomChange => Color::Magenta,
    }
}

/// `[note]` badge span.
pub fn note_badge(kind: NoteKind, note: &str) -> Span<'static> {
    Span::styled(
        format!(" [{note}]"),
        Style::default()
            .fg(note_color(kind))
            .add_modifier(Modifier::BOLD),
    )
}
