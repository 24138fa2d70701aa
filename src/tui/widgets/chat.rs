//! # Widget: AI Chat
//!
//! Transcript of completed turns, the question awaiting a reply, the last
//! send error, and the input line at the bottom. Only the newest lines that
//! fit are shown.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{error_line, muted};
use crate::api::types::ChatRole;
use crate::tui::app::{App, InputMode};

fn turn_line(label: &str, color: Color, content: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(content.to_string()),
    ])
}

/// Builds the transcript lines, oldest first.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let you = app.strings.get("you");
    let assistant = app.strings.get("assistant");

    let mut lines: Vec<Line<'static>> = app
        .chat
        .history
        .iter()
        .map(|turn| match turn.role {
            ChatRole::User => turn_line(you, Color::Cyan, &turn.content),
            ChatRole::Assistant => turn_line(assistant, Color::Green, &turn.content),
        })
        .collect();

    if let Some(pending) = &app.chat.pending {
        lines.push(turn_line(you, Color::Cyan, pending));
        lines.push(turn_line(
            assistant,
            Color::Green,
            app.strings.get("chat_thinking"),
        ));
    }
    if let Some(error) = &app.chat.error {
        lines.push(error_line(app, "chat_error", error));
    }
    lines
}

/// Builds the input line.
pub fn input_line(app: &App) -> Line<'static> {
    if app.input_mode == InputMode::Chat {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input_buffer.clone()),
            Span::styled("\u{2581}", Style::default().fg(Color::Yellow)),
        ])
    } else {
        muted(app.strings.get("chat_placeholder"))
    }
}

/// Renders the chat widget.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let border = if app.input_mode == InputMode::Chat {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("chat")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let lines = transcript_lines(app);
    let visible = chunks[0].height as usize;
    let skip = lines.len().saturating_sub(visible);
    let transcript: Vec<Line> = lines.into_iter().skip(skip).collect();
    f.render_widget(
        Paragraph::new(transcript).wrap(Wrap { trim: true }),
        chunks[0],
    );
    f.render_widget(Paragraph::new(input_line(app)), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ChatTurn;
    use crate::prefs::Preferences;
    use crate::tui::widgets::line_text;

    fn app() -> App {
        App::new(Preferences::default(), None)
    }

    #[test]
    fn test_transcript_labels_roles() {
        let mut app = app();
        app.chat.history = vec![
            ChatTurn {
                role: ChatRole::User,
                content: "Wann ist Pause?".into(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "Um 09:40.".into(),
            },
        ];
        let lines: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert_eq!(lines, vec!["Du: Wann ist Pause?", "KI: Um 09:40."]);
    }

    #[test]
    fn test_pending_question_shows_thinking() {
        let mut app = app();
        app.chat.pending = Some("Hallo".into());
        let lines: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert_eq!(lines, vec!["Du: Hallo", "KI: Denke nach..."]);
    }

    #[test]
    fn test_error_shown_inline() {
        let mut app = app();
        app.chat.error = Some("Netzwerkfehler: timeout".into());
        let lines: Vec<String> = transcript_lines(&app).iter().map(line_text).collect();
        assert_eq!(
            lines,
            vec!["Fehler beim Senden der Nachricht: Netzwerkfehler: timeout"]
        );
    }

    #[test]
    fn test_input_line_modes() {
        let mut app = app();
        assert_eq!(line_text(&input_line(&app)), "[c] Frage stellen");
        app.input_mode = InputMode::Chat;
        app.input_buffer = "Hi".into();
        assert_eq!(line_text(&input_line(&app)), "> Hi\u{2581}");
    }
}
