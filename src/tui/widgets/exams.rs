//! # Widget: Exams
//!
//! Upcoming exams with title, room, time window, description and a change
//! badge. Unrecognised exam notes are shown as moves.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{muted, note_badge, placeholder};
use crate::api::types::Lesson;
use crate::i18n::{format_time_window, Language};
use crate::tui::app::App;

fn exam_block(exam: &Lesson, language: Language) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        exam.summary.clone(),
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )];
    if let (Some(kind), Some(note)) = (exam.exam_note_kind(), exam.special_note()) {
        title.push(note_badge(kind, note));
    }

    let mut lines = vec![Line::from(title)];
    if let Some(location) = exam.location() {
        lines.push(Line::from(location.to_string()));
    }
    lines.push(Line::from(format_time_window(
        &exam.start,
        exam.end.as_ref(),
        language,
    )));
    if let Some(description) = exam.description() {
        lines.push(muted(description));
    }
    lines
}

/// Builds the exam list.
pub fn exam_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.timetable, "exams_error") {
        return lines;
    }
    let exams = app
        .timetable
        .ready()
        .map(|t| t.exams.as_slice())
        .unwrap_or_default();
    if exams.is_empty() {
        return vec![Line::from(app.strings.get("no_exams").to_string())];
    }

    let mut lines = Vec::new();
    for (i, exam) in exams.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(exam_block(exam, app.language()));
    }
    lines
}

/// Renders the exam list.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("exams")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(exam_lines(app))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
