//! # Widget: Clock
//!
//! Local wall time, the long date in the UI language, the notification
//! toggle, and the most recent notices (exam reminders, session messages).

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::muted;
use crate::i18n::{format_clock, format_long_date};
use crate::tui::app::App;

/// Builds the clock lines.
pub fn clock_lines(app: &App) -> Vec<Line<'static>> {
    let local = app.clock.with_timezone(&Local);
    let notify_key = if app.prefs.notifications {
        "notifications_on"
    } else {
        "notifications_off"
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format_clock(&local),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format_long_date(&local, app.language())),
        muted(app.strings.get(notify_key)),
    ];
    lines.extend(app.notices.iter().rev().map(|notice| {
        Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        ))
    }));
    lines
}

/// Renders the clock widget.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(clock_lines(app)).block(block), area);
}
