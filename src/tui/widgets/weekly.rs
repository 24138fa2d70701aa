//! # Widget: Weekly Schedule Overlay
//!
//! Seven days of lessons in a centered popup, one heading per day in the UI
//! language. A backend notice is shown instead of the schedule when present.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::lessons::today_row;
use super::{muted, placeholder};
use crate::i18n::format_day;
use crate::tui::app::App;

/// Builds the weekly schedule lines.
pub fn weekly_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.weekly, "weekly_error") {
        return lines;
    }
    let Some(weekly) = app.weekly.ready() else {
        return Vec::new();
    };
    if let Some(message) = &weekly.message {
        return vec![Line::from(message.clone())];
    }

    let mut lines = Vec::new();
    for day in &weekly.weekly_schedule {
        lines.push(Line::from(Span::styled(
            format_day(day.date, app.language()),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        if day.lessons.is_empty() {
            lines.push(muted("  -"));
        }
        for lesson in &day.lessons {
            let mut row = today_row(lesson, &app.strings);
            row.spans.insert(0, Span::raw("  "));
            lines.push(row);
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Centered rectangle taking `percent_x` by `percent_y` of `area`.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = area.height.saturating_mul(percent_y) / 100;
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Renders the weekly overlay over `area`.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, 80, 80);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("weekly")))
        .title_bottom(" [w] / [Esc] ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(weekly_lines(app))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::prefs::Preferences;
    use crate::tui::app::Loadable;
    use crate::tui::widgets::line_text;

    fn texts(app: &App) -> Vec<String> {
        weekly_lines(app).iter().map(line_text).collect()
    }

    #[test]
    fn test_days_with_localized_headings() {
        let mut app = App::new(Preferences::default(), None);
        app.weekly = Loadable::Ready(
            serde_json::from_value(serde_json::json!({
                "weekly_schedule": [
                    {"date": "2025-11-17", "lessons": [
                        {"summary": "Englisch - Fr. Meier", "start": "2025-11-17T08:00:00+01:00",
                         "end": "2025-11-17T08:45:00+01:00"}
                    ]},
                    {"date": "2025-11-18", "lessons": []}
                ]
            }))
            .expect("test: weekly"),
        );
        let lines = texts(&app);
        assert_eq!(lines[0], "Montag, 17. November 2025");
        assert_eq!(lines[1], "  08:00 - 08:45 Englisch - Fr. Meier");
        assert_eq!(lines[3], "Dienstag, 18. November 2025");
        assert_eq!(lines[4], "  -");

        app.strings.set_language(Language::En);
        assert_eq!(texts(&app)[0], "Monday, November 17, 2025");
    }

    #[test]
    fn test_message_replaces_schedule() {
        let mut app = App::new(Preferences::default(), None);
        app.weekly = Loadable::Ready(
            serde_json::from_value(serde_json::json!({
                "weekly_schedule": [],
                "message": "Keine ICS-Datei gefunden."
            }))
            .expect("test: weekly"),
        );
        assert_eq!(texts(&app), vec!["Keine ICS-Datei gefunden."]);
    }

    #[test]
    fn test_weekly_error() {
        let mut app = App::new(Preferences::default(), None);
        app.weekly = Loadable::Failed("HTTP 502 von /api/weekly?mode=auto".into());
        assert_eq!(
            texts(&app),
            vec!["Fehler beim Laden des Wochenplans: HTTP 502 von /api/weekly?mode=auto"]
        );
    }

    #[test]
    fn test_centered_popup() {
        let popup = centered(Rect::new(0, 0, 100, 40), 80, 80);
        assert_eq!(popup, Rect::new(10, 4, 80, 32));
    }
}
