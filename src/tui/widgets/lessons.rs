//! # Widget: Lessons
//!
//! ## Responsibility
//! Renders the next lesson (with its start countdown), the running lesson
//! (with its end countdown and notebook state), and today's lesson list.
//!
//! ## Guarantees
//! - Times are shown in the offset the backend sent, never shifted
//! - Only a lesson flagged `is_cancelled` is struck through; a special note
//!   alone just adds a colored badge
//! - A backend `message` replaces the next-lesson panel

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{muted, note_badge, placeholder};
use crate::api::types::Lesson;
use crate::api::TimetableSource;
use crate::coordinator::countdown::{Countdown, CountdownKind, CountdownState};
use crate::i18n::{format_time_window, time_range, Strings};
use crate::tui::app::App;

/// Countdown text: placeholder, running time with prefix, or the terminal
/// message.
pub fn countdown_text(countdown: &Countdown, strings: &Strings) -> String {
    let (prefix_key, done_key) = match countdown.kind() {
        CountdownKind::LessonStart => ("starts_in", "lesson_starting"),
        CountdownKind::LessonEnd => ("ends_in", "lesson_ended"),
    };
    match countdown.state() {
        CountdownState::Pending => strings.get("calculating").to_string(),
        CountdownState::Running(remaining) => {
            format!("{}{}", strings.get(prefix_key), remaining.compact())
        }
        CountdownState::Finished => strings.get(done_key).to_string(),
    }
}

fn countdown_line(countdown: &Countdown, strings: &Strings) -> Line<'static> {
    let color = match countdown.state() {
        CountdownState::Finished => Color::Green,
        _ => Color::Yellow,
    };
    Line::from(Span::styled(
        countdown_text(countdown, strings),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn title_style(lesson: &Lesson) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if lesson.is_cancelled {
        style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        style
    }
}

/// Builds the next-lesson panel.
pub fn next_lesson_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.timetable, "timetable_error") {
        return lines;
    }
    let Some(timetable) = app.timetable.ready() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    if let Some(message) = &timetable.message {
        lines.push(Line::from(message.clone()));
    } else if let Some(lesson) = &timetable.next_lesson {
        let mut title = vec![Span::styled(lesson.summary.clone(), title_style(lesson))];
        if let (Some(kind), Some(note)) = (lesson.lesson_note_kind(), lesson.special_note()) {
            title.push(note_badge(kind, note));
        }
        lines.push(Line::from(title));
        if let Some(location) = lesson.location() {
            lines.push(Line::from(location.to_string()));
        }
        lines.push(Line::from(format_time_window(
            &lesson.start,
            lesson.end.as_ref(),
            app.language(),
        )));
        if let Some(countdown) = &app.next_countdown {
            lines.push(countdown_line(countdown, &app.strings));
        }
        if let Some(description) = lesson.description() {
            lines.push(muted(description));
        }
    } else {
        lines.push(Line::from(app.strings.get("no_upcoming_lessons").to_string()));
    }

    if app.timetable_source == Some(TimetableSource::Snapshot) {
        lines.push(muted(&format!("({})", app.strings.get("snapshot"))));
    }
    lines
}

/// Builds the current-lesson panel.
pub fn current_lesson_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.timetable, "timetable_error") {
        return lines;
    }
    let Some(current) = app.timetable.ready().and_then(|t| t.current_lesson.as_ref()) else {
        return vec![Line::from(app.strings.get("no_lesson").to_string())];
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", app.strings.get("current_subject"))),
        Span::styled(
            current.subject.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    if let Some(countdown) = &app.current_countdown {
        lines.push(countdown_line(countdown, &app.strings));
    }
    match current.notebook() {
        Some(_) => lines.push(Line::from(Span::styled(
            app.strings.get("open_notebook").to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ))),
        None => lines.push(muted(app.strings.get("no_notebook"))),
    }
    lines
}

/// One row of today's list: `HH:MM - HH:MM summary [location] [(exam)]`.
pub fn today_row(lesson: &Lesson, strings: &Strings) -> Line<'static> {
    let mut text = format!(
        "{} {}",
        time_range(&lesson.start, lesson.end.as_ref()),
        lesson.summary
    );
    if let Some(location) = lesson.location() {
        text.push_str(&format!(" [{location}]"));
    }
    let style = if lesson.is_cancelled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::styled(text, style)];
    if lesson.is_exam {
        spans.push(Span::styled(
            format!(" {}", strings.get("exam_badge")),
            Style::default().fg(Color::Red),
        ));
    }
    if let (Some(kind), Some(note)) = (lesson.lesson_note_kind(), lesson.special_note()) {
        spans.push(note_badge(kind, note));
    }
    Line::from(spans)
}

/// Builds today's lesson list.
pub fn today_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.timetable, "timetable_error") {
        return lines;
    }
    let lessons = app
        .timetable
        .ready()
        .map(|t| t.todays_lessons.as_slice())
        .unwrap_or_default();
    if lessons.is_empty() {
        return vec![Line::from(app.strings.get("no_lessons_today").to_string())];
    }
    lessons
        .iter()
        .map(|lesson| today_row(lesson, &app.strings))
        .collect()
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Renders the next-lesson panel.
pub fn render_next(f: &mut Frame, area: Rect, app: &App) {
    let para = Paragraph::new(next_lesson_lines(app))
        .block(panel(app.strings.get("next_lesson")))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// Renders the current-lesson panel.
pub fn render_current(f: &mut Frame, area: Rect, app: &App) {
    let para = Paragraph::new(current_lesson_lines(app))
        .block(panel(app.strings.get("current_lesson")))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

/// Renders today's lesson list.
pub fn render_today(f: &mut Frame, area: Rect, app: &App) {
    let para = Paragraph::new(today_lines(app)).block(panel(app.strings.get("todays_lessons")));
    f.render_widget(para, area);
}
