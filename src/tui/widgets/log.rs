//! # Widget: Event Log
//!
//! ## Responsibility
//! Renders the tail of the in-app event log (fetch failures, lesson
//! boundaries, exam notices) with color-coded severity levels.
//! INFO=white, WARN=yellow, ERROR=red, DEBUG=gray.
//!
//! ## Guarantees
//! - Fixed-width timestamp column for alignment
//! - Long lines truncated with `…` on a character boundary rather than wrapping
//! - Handles empty log list gracefully
//! - Newest entries appear at the bottom unless scrolled back

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::app::{App, LogEntry, LogLevel};

/// Returns the display color for a log level.
///
/// # Arguments
/// * `level` - The log severity level.
///
/// # Returns
/// White for Info, Yellow for Warn, Red for Error, DarkGray for Debug.
pub fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => Color::White,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Error => Color::Red,
        LogLevel::Debug => Color::DarkGray,
    }
}

/// Truncates a string to a maximum width in characters, adding `…` if
/// truncated.
///
/// # Arguments
/// * `s` - The string to potentially truncate.
/// * `max_width` - Maximum character width.
///
/// # Returns
/// The string unchanged if it fits, or truncated with trailing `…`.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_width - 1).collect();
    out.push('\u{2026}');
    out
}

/// The entries that fit in `count` rows, oldest first, honoring the
/// scroll offset.
pub fn visible_entries(app: &App, count: usize) -> Vec<&LogEntry> {
    let end = app.log_entries.len().saturating_sub(app.log_scroll_offset);
    let start = end.saturating_sub(count);
    app.log_entries.range(start..end).collect()
}

fn entry_line(entry: &LogEntry, max_width: usize) -> Line<'static> {
    let color = level_color(entry.level);
    let prefix_width = entry.timestamp.chars().count() + 3 + entry.level.label().len() + 2;
    let body = if entry.fields.is_empty() {
        entry.message.clone()
    } else {
        format!("{} {}", entry.message, entry.fields)
    };
    Line::from(vec![
        Span::styled(
            format!("[{}] ", entry.timestamp),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{}  ", entry.level.label()),
            Style::default().fg(color),
        ),
        Span::styled(
            truncate_with_ellipsis(&body, max_width.saturating_sub(prefix_width)),
            Style::default().fg(color),
        ),
    ])
}

/// Renders the event log widget.
///
/// # Arguments
/// * `f` - Ratatui frame to render into.
/// * `area` - Rectangular area allocated for this widget.
/// * `app` - Application state containing log entries.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.log_scroll_offset > 0 {
        format!(" {} (-{}) ", app.strings.get("log"), app.log_scroll_offset)
    } else {
        format!(" {} ", app.strings.get("log"))
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = visible_entries(app, inner.height as usize)
        .into_iter()
        .map(|entry| entry_line(entry, inner.width as usize))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}
