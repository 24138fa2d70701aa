//! # Widget: Search Bar
//!
//! Query input, the engine row with the active engine highlighted, and a key
//! hint. Google is highlighted until Tab picks another engine.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::muted;
use crate::launch::SearchEngine;
use crate::tui::app::{App, InputMode};

/// Builds the search bar lines.
pub fn search_lines(app: &App) -> Vec<Line<'static>> {
    let typing = app.input_mode == InputMode::Search;

    let input = if typing {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input_buffer.clone()),
            Span::styled("\u{2581}", Style::default().fg(Color::Yellow)),
        ])
    } else {
        muted(app.strings.get("search_placeholder"))
    };

    let mut engines = Vec::with_capacity(SearchEngine::ALL.len() * 2);
    for (i, engine) in SearchEngine::ALL.iter().enumerate() {
        if i > 0 {
            engines.push(Span::raw(" "));
        }
        let style = if typing && *engine == app.search_engine {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        engines.push(Span::styled(engine.label().to_string(), style));
    }

    let mut lines = vec![input, Line::from(engines)];
    if typing {
        lines.push(muted(app.strings.get("search_hint")));
    }
    lines
}

/// Renders the search bar.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.input_mode == InputMode::Search {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("search")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(search_lines(app)).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Preferences;
    use crate::tui::widgets::line_text;

    #[test]
    fn test_idle_bar_shows_shortcut() {
        let app = App::new(Preferences::default(), None);
        let lines = search_lines(&app);
        assert_eq!(line_text(&lines[0]), "[s] Im Web suchen");
        assert_eq!(line_text(&lines[1]), "Google ChatGPT GitHub Brave");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_active_engine_highlighted_while_typing() {
        let mut app = App::new(Preferences::default(), None);
        app.input_mode = InputMode::Search;
        app.input_buffer = "Vektoren".into();
        app.search_engine = SearchEngine::Brave;
        let lines = search_lines(&app);
        assert_eq!(line_text(&lines[0]), "> Vektoren\u{2581}");
        let brave = lines[1]
            .spans
            .iter()
            .find(|s| s.content == "Brave")
            .expect("test: brave span");
        assert_eq!(brave.style.bg, Some(Color::Yellow));
        let google = lines[1]
            .spans
            .iter()
            .find(|s| s.content == "Google")
            .expect("test: google span");
        assert_eq!(google.style.bg, None);
        assert_eq!(
            line_text(&lines[2]),
            "[Tab] Suchmaschine  [Enter] Suchen"
        );
    }
}
