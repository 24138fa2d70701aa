//! Full-frame rendering with the test backend.

use std::time::Instant;

use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::json;
use wiremock::MockServer;

use school_dashboard::tui::app::{App, MIN_COLS, MIN_ROWS};
use school_dashboard::tui::events::{apply_event, InputEvent};
use school_dashboard::tui::ui;
use school_dashboard::Command;

use super::{
    client_for, coordinator, mount_json, mount_startup_defaults, new_app, run_all, timetable_body,
    wall,
};

fn screen(app: &App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal.draw(|f| ui::draw(f, app)).expect("draw");
    let buffer = terminal.backend().buffer().clone();
    buffer
        .content()
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn loaded_app() -> App {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body(
            "Mathematik - Hr. Keller",
            "2025-11-14T08:00:00+01:00",
            "2025-11-14T08:45:00+01:00",
            json!([{"summary": "Prüfung Chemie", "start": "2025-11-21T10:00:00+01:00"}]),
        ),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();
    let initial = c.start(Instant::now(), &app);
    run_all(&client, &mut c, &mut app, initial, wall(6, 30)).await;
    app
}

#[tokio::test]
async fn test_loaded_dashboard_shows_lesson_countdown_and_weather() {
    let app = loaded_app().await;
    let text = screen(&app, 140, 45);

    assert!(text.contains("Mathematik - Hr. Keller"));
    assert!(text.contains("Beginnt in 30m 0s"));
    assert!(text.contains("08:00 - 08:45 Mathematik - Hr. Keller [B12]"));
    assert!(text.contains("Prüfung Chemie"));
    assert!(text.contains("Bedeckt"));
    assert!(text.contains("Gerade kein Unterricht"));
}

#[tokio::test]
async fn test_english_labels_after_toggle() {
    let mut app = loaded_app().await;
    let mut c = coordinator(false);
    c.handle(Command::ToggleLanguage, &mut app, wall(6, 30));
    let text = screen(&app, 140, 45);

    assert!(text.contains("Next lesson"));
    assert!(text.contains("Weather"));
    assert!(!text.contains("Nächste Lektion"));
}

#[tokio::test]
async fn test_help_overlay_toggles_from_key_event() {
    let mut app = loaded_app().await;
    assert!(apply_event(&mut app, InputEvent::Help).is_none());
    let text = screen(&app, 140, 45);
    assert!(text.contains("Hilfe"));
    assert!(text.contains("Sprache wechseln"));

    apply_event(&mut app, InputEvent::Help);
    assert!(!app.show_help);
}

#[tokio::test]
async fn test_search_bar_shows_typed_query() {
    let mut app = loaded_app().await;
    apply_event(&mut app, InputEvent::StartSearch);
    for c in "Mitose".chars() {
        apply_event(&mut app, InputEvent::Char(c));
    }
    apply_event(&mut app, InputEvent::NextEngine);
    let text = screen(&app, 140, 45);
    assert!(text.contains("> Mitose"));
    assert!(text.contains("Google ChatGPT GitHub Brave"));
    assert!(text.contains("[Tab] Suchmaschine"));
}

#[test]
fn test_too_small_terminal_renders_guard_only() {
    let app = new_app();
    let text = screen(&app, MIN_COLS - 1, MIN_ROWS);
    assert!(text.contains("Terminal zu klein"));
    assert!(!text.contains("Wetter"));
}
