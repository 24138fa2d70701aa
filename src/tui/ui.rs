//! # Module: TUI Rendering
//!
//! ## Responsibility
//! Orchestrates the overall dashboard layout by dividing the terminal into regions
//! and delegating to individual widget renderers. Handles the minimum size guard
//! and the weekly, message and help overlays.
//!
//! ## Guarantees
//! - Minimum size guard displays a centered message if terminal is too small
//! - Overlays stack weekly, then message detail, then help on top
//! - No panics during rendering regardless of terminal dimensions

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, MIN_COLS, MIN_ROWS};
use super::widgets;
use crate::i18n::Language;

/// Renders the complete dashboard UI into the given frame.
///
/// # Arguments
/// * `f` - The Ratatui frame to render into.
/// * `app` - The application state to display.
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    // Minimum size guard
    if size.width < MIN_COLS || size.height < MIN_ROWS {
        draw_too_small(f, size, app);
        return;
    }

    let outer_block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.strings.get("title")),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            app.strings.get("footer").to_string(),
            Style::default().fg(Color::DarkGray),
        )))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = outer_block.inner(size);
    f.render_widget(outer_block, size);

    // Clock/search/weather, lessons, messages/chat, log
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(8),
            Constraint::Length(6),
        ])
        .split(inner);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ])
        .split(rows[0]);
    widgets::clock::render(f, top[0], app);
    widgets::search::render(f, top[1], app);
    widgets::weather::render(f, top[2], app);

    let middle = halves(rows[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(5)])
        .split(middle[0]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(middle[1]);
    widgets::lessons::render_next(f, left[0], app);
    widgets::lessons::render_current(f, left[1], app);
    widgets::lessons::render_today(f, right[0], app);
    widgets::exams::render(f, right[1], app);

    let bottom = halves(rows[2]);
    widgets::messages::render(f, bottom[0], app);
    widgets::chat::render(f, bottom[1], app);

    widgets::log::render(f, rows[3], app);

    if app.show_weekly {
        widgets::weekly::render(f, inner, app);
    }
    if app.isy.open_message.is_some() {
        widgets::messages::render_detail(f, inner, app);
    }
    if app.show_help {
        draw_help_overlay(f, size, app);
    }
}

fn halves(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area)
}

/// Renders the "terminal too small" warning.
fn draw_too_small(f: &mut Frame, area: Rect, app: &App) {
    let msg = format!(
        "{} {}x{}",
        app.strings.get("terminal_too_small"),
        MIN_COLS,
        MIN_ROWS
    );
    let current_size = format!("{}x{}", area.width, area.height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            msg,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            current_size,
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    f.render_widget(para, area);
}

/// Key bindings shown in the help overlay.
pub fn help_entries(language: Language) -> &'static [(&'static str, &'static str)] {
    match language {
        Language::De => &[
            ("q / Ctrl+C", "Beenden"),
            ("Esc", "Schliessen / Abbrechen"),
            ("h / ?", "Hilfe ein/aus"),
            ("w", "Wochenplan"),
            ("l", "Sprache wechseln"),
            ("n", "Prüfungs-Benachrichtigungen ein/aus"),
            ("r", "Alles neu laden"),
            ("c", "Frage an den KI-Assistenten"),
            ("s / Tab", "Websuche / Suchmaschine wechseln"),
            ("b", "Notizbuch der Lektion öffnen"),
            ("i", "ISY anmelden / neu laden"),
            ("m", "Nächster ISY-Ordner"),
            ("\u{2191}\u{2193} / Enter", "Mitteilung wählen / öffnen"),
            ("a", "Mitteilung archivieren"),
            ("o", "ISY abmelden"),
            ("PgUp / PgDn", "Protokoll blättern"),
        ],
        Language::En => &[
            ("q / Ctrl+C", "Quit"),
            ("Esc", "Close / cancel"),
            ("h / ?", "Toggle help"),
            ("w", "Weekly schedule"),
            ("l", "Switch language"),
            ("n", "Toggle exam notifications"),
            ("r", "Reload everything"),
            ("c", "Ask the AI assistant"),
            ("s / Tab", "Web search / switch engine"),
            ("b", "Open the lesson's notebook"),
            ("i", "Log in to ISY / reload"),
            ("m", "Next ISY folder"),
            ("\u{2191}\u{2193} / Enter", "Select / open message"),
            ("a", "Archive message"),
            ("o", "Log out of ISY"),
            ("PgUp / PgDn", "Scroll log"),
        ],
    }
}

/// Renders the help overlay.
fn draw_help_overlay(f: &mut Frame, area: Rect, app: &App) {
    let entries = help_entries(app.language());
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = (entries.len() as u16 + 4).min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let mut help_text = vec![Line::from("")];
    help_text.extend(entries.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {keys:<16}"), Style::default().fg(Color::Yellow)),
            Span::styled(action.to_string(), Style::default().fg(Color::White)),
        ])
    }));

    let block = Block::default()
        .title(format!(" {} ", app.strings.get("help")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let para = Paragraph::new(help_text).block(block);
    f.render_widget(para, popup_area);
}
