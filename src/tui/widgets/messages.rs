//! # Widget: ISY Messages
//!
//! ## Responsibility
//! Login prompt while logged out; folder header and message list while
//! logged in; an overlay for an opened message.
//!
//! ## Guarantees
//! - The password is never rendered, only masked
//! - The selected row is always marked, unread rows are bold

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::weekly::centered;
use super::{error_line, muted, placeholder};
use crate::api::types::MessageSummary;
use crate::tui::app::{App, InputMode, Loadable};

const CURSOR: &str = "\u{2581}";

fn login_lines(app: &App) -> Vec<Line<'static>> {
    let username = app.strings.get("username");
    let password = app.strings.get("password");
    let mut lines = match app.input_mode {
        InputMode::LoginUser => vec![Line::from(format!(
            "{username}: {}{CURSOR}",
            app.input_buffer
        ))],
        InputMode::LoginPassword => vec![
            Line::from(format!("{username}: {}", app.isy.pending_username)),
            Line::from(format!(
                "{password}: {}{CURSOR}",
                "*".repeat(app.input_buffer.chars().count())
            )),
        ],
        _ => vec![muted(app.strings.get("login_prompt"))],
    };
    if let Some(error) = &app.isy.login_error {
        lines.push(error_line(app, "login_failed", error));
    }
    lines
}

fn message_row(message: &MessageSummary, selected: bool) -> Line<'static> {
    let mut style = Style::default();
    if !message.read {
        style = style.add_modifier(Modifier::BOLD);
    }
    if selected {
        style = style.fg(Color::Black).bg(Color::Cyan);
    }
    let mut text = String::from(if selected { "> " } else { "  " });
    if let Some(date) = &message.date {
        text.push_str(date);
        text.push_str("  ");
    }
    if let Some(sender) = &message.sender {
        text.push_str(sender);
        text.push_str(": ");
    }
    text.push_str(&message.subject);
    Line::from(Span::styled(text, style))
}

/// Builds the panel lines.
pub fn message_lines(app: &App) -> Vec<Line<'static>> {
    if !app.isy.logged_in {
        return login_lines(app);
    }

    let mut lines = vec![Line::from(vec![
        Span::raw(format!(
            "{} {}",
            app.strings.get("logged_in_as"),
            app.isy.username.as_deref().unwrap_or("?")
        )),
        Span::styled(
            format!("  [{}]", app.strings.get(app.isy.folder.label_key())),
            Style::default().fg(Color::Cyan),
        ),
    ])];

    if let Some(placeholder) = placeholder(app, &app.isy.messages, "messages_error") {
        lines.extend(placeholder);
        return lines;
    }
    let messages = app.isy.messages.ready().map(Vec::as_slice).unwrap_or_default();
    if messages.is_empty() {
        lines.push(Line::from(app.strings.get("no_messages").to_string()));
    }
    lines.extend(
        messages
            .iter()
            .enumerate()
            .map(|(i, m)| message_row(m, i == app.isy.selected)),
    );
    lines
}

/// Builds the opened-message overlay lines.
pub fn detail_lines(app: &App) -> Vec<Line<'static>> {
    let Some(open) = &app.isy.open_message else {
        return Vec::new();
    };
    if let Some(lines) = placeholder(app, open, "messages_error") {
        return lines;
    }
    let Some(detail) = open.ready() else {
        return Vec::new();
    };

    let mut lines = vec![Line::from(Span::styled(
        detail.subject.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let meta: Vec<&str> = [detail.sender.as_deref(), detail.date.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !meta.is_empty() {
        lines.push(muted(&meta.join("  ")));
    }
    lines.push(Line::from(""));
    if let Some(body) = &detail.body {
        lines.extend(body.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}

/// Renders the message panel.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let border = if matches!(
        app.input_mode,
        InputMode::LoginUser | InputMode::LoginPassword
    ) {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("messages")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner_height = block.inner(area).height as usize;

    // Keep the selected row visible.
    let lines = message_lines(app);
    let selected_line = app.isy.selected + 1;
    let skip = (selected_line + 1).saturating_sub(inner_height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    f.render_widget(Paragraph::new(visible).block(block), area);
}

/// Renders the opened message over `area`.
pub fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let popup = centered(area, 70, 70);
    f.render_widget(Clear, popup);
    let archive_hint = match &app.isy.open_message {
        Some(Loadable::Ready(_)) => " [a] / [Esc] ",
        _ => " [Esc] ",
    };
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("messages")))
        .title_bottom(archive_hint)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(detail_lines(app))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(para, popup);
}
