//! End-to-end refresh flow: coordinator, client and app state together.

use std::time::{Duration, Instant};

use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use school_dashboard::api::types::WeatherReport;
use school_dashboard::api::TimetableSource;
use school_dashboard::coordinator::dispatch::execute;
use school_dashboard::coordinator::Dispatcher;
use school_dashboard::i18n::Language;
use school_dashboard::prefs::Preferences;
use school_dashboard::tui::app::{App, Loadable};
use school_dashboard::{Command, FetchRequest};

use super::{
    client_for, coordinator, mount_json, mount_startup_defaults, new_app, run_all, timetable_body,
    wall,
};

fn next_summary(app: &App) -> Option<String> {
    app.timetable
        .ready()
        .and_then(|t| t.next_lesson.as_ref())
        .map(|l| l.summary.clone())
}

fn timetable_requests(requests: &[FetchRequest]) -> Vec<TimetableSource> {
    requests
        .iter()
        .filter_map(|r| match r {
            FetchRequest::Timetable { source, .. } => Some(*source),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_fast_load_paints_snapshot_then_live() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/static/fast_timetable.json",
        200,
        timetable_body("Snapshot-Fach", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body("Mathematik - Hr. Keller", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(true);
    let mut app = new_app();
    let now = Instant::now();

    let initial = c.start(now, &app);
    assert_eq!(timetable_requests(&initial), vec![TimetableSource::Snapshot]);
    run_all(&client, &mut c, &mut app, initial, wall(6, 0)).await;
    assert_eq!(app.timetable_source, Some(TimetableSource::Snapshot));
    assert_eq!(next_summary(&app).as_deref(), Some("Snapshot-Fach"));
    assert!(matches!(app.weather, Loadable::Ready(WeatherReport::Conditions(_))));

    let follow_up = c.tick(now, wall(6, 0), &mut app);
    assert_eq!(timetable_requests(&follow_up), vec![TimetableSource::Live]);
    run_all(&client, &mut c, &mut app, follow_up, wall(6, 0)).await;
    assert_eq!(app.timetable_source, Some(TimetableSource::Live));
    assert_eq!(next_summary(&app).as_deref(), Some("Mathematik - Hr. Keller"));
}

#[tokio::test]
async fn test_late_snapshot_does_not_overwrite_live() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/static/fast_timetable.json",
        200,
        timetable_body("Alt", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body("Neu", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(true);
    let mut app = new_app();
    let now = Instant::now();

    let initial = c.start(now, &app);
    let (snapshot, others): (Vec<_>, Vec<_>) = initial
        .into_iter()
        .partition(|r| matches!(r, FetchRequest::Timetable { .. }));
    let live = c.tick(now, wall(6, 0), &mut app);

    // Live answers first, the snapshot straggles in afterwards.
    run_all(&client, &mut c, &mut app, live, wall(6, 0)).await;
    run_all(&client, &mut c, &mut app, snapshot, wall(6, 0)).await;
    run_all(&client, &mut c, &mut app, others, wall(6, 0)).await;

    assert_eq!(app.timetable_source, Some(TimetableSource::Live));
    assert_eq!(next_summary(&app).as_deref(), Some("Neu"));
}

#[tokio::test]
async fn test_weather_error_is_shown_and_polling_continues() {
    let server = MockServer::start().await;
    mount_json(&server, "/static/lang/de.json", 200, json!({})).await;
    mount_json(&server, "/api/isy/status", 200, json!({"logged_in": false})).await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body("Deutsch", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;
    mount_json(
        &server,
        "/api/weather",
        500,
        json!({"error": "OpenWeather API key not configured"}),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();
    let now = Instant::now();

    let initial = c.start(now, &app);
    run_all(&client, &mut c, &mut app, initial, wall(6, 0)).await;

    assert!(matches!(
        app.weather,
        Loadable::Ready(WeatherReport::Unavailable { .. })
    ));
    assert!(app.timetable.ready().is_some());

    let later = c.tick(now + Duration::from_secs(600), wall(6, 10), &mut app);
    assert!(later
        .iter()
        .any(|r| matches!(r, FetchRequest::Weather { .. })));
}

#[tokio::test]
async fn test_timetable_failure_leaves_weather_alone() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/timetable"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();

    let initial = c.start(Instant::now(), &app);
    run_all(&client, &mut c, &mut app, initial, wall(6, 0)).await;

    assert_eq!(
        app.timetable,
        Loadable::Failed("HTTP 502 von /api/timetable?mode=auto".into())
    );
    assert!(matches!(app.weather, Loadable::Ready(_)));
}

#[tokio::test]
async fn test_crossed_boundary_refetches_once() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body("Englisch", "2025-11-14T08:00:00+01:00", "2025-11-14T08:45:00+01:00", json!([])),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();
    let now = Instant::now();

    let initial = c.start(now, &app);
    run_all(&client, &mut c, &mut app, initial, wall(6, 59)).await;

    // 08:00+01:00 is 07:00 UTC.
    let first = c.tick(now + Duration::from_secs(1), wall(7, 0), &mut app);
    assert_eq!(timetable_requests(&first), vec![TimetableSource::Live]);
    let second = c.tick(now + Duration::from_secs(2), wall(7, 0), &mut app);
    assert!(timetable_requests(&second).is_empty());
}

#[tokio::test]
async fn test_exam_reminder_fires_once_across_refreshes() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body(
            "Deutsch",
            "2025-11-14T08:00:00+01:00",
            "2025-11-14T08:45:00+01:00",
            json!([{"summary": "Chemie - Fr. Huber", "start": "2025-11-17T07:30:00+01:00", "is_exam": true}]),
        ),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = App::new(
        Preferences {
            language: Language::De,
            notifications: true,
        },
        None,
    );

    let initial = c.start(Instant::now(), &app);
    run_all(&client, &mut c, &mut app, initial, wall(7, 0)).await;
    let refresh = c.handle(Command::RefreshAll, &mut app, wall(7, 0));
    run_all(&client, &mut c, &mut app, refresh, wall(7, 0)).await;

    let reminders = app
        .notices
        .iter()
        .filter(|n| n.as_str() == "Prüfung in 3 Tagen: Chemie")
        .count();
    assert_eq!(reminders, 1);
}

#[tokio::test]
async fn test_exam_reminder_waits_for_notifications() {
    let server = MockServer::start().await;
    mount_startup_defaults(&server).await;
    mount_json(
        &server,
        "/api/timetable",
        200,
        timetable_body(
            "Deutsch",
            "2025-11-14T08:00:00+01:00",
            "2025-11-14T08:45:00+01:00",
            json!([{"summary": "Chemie - Fr. Huber", "start": "2025-11-17T07:30:00+01:00", "is_exam": true}]),
        ),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();
    assert!(!app.prefs.notifications);

    let initial = c.start(Instant::now(), &app);
    run_all(&client, &mut c, &mut app, initial, wall(7, 0)).await;
    assert!(app.timetable.ready().is_some());
    assert!(!app.notices.iter().any(|n| n.starts_with("Prüfung")));

    c.handle(Command::ToggleNotifications, &mut app, wall(7, 0));
    assert_eq!(
        app.notices.back().map(String::as_str),
        Some("Prüfung in 3 Tagen: Chemie")
    );
}

#[tokio::test]
async fn test_expired_isy_session_is_cleared() {
    let server = MockServer::start().await;
    mount_json(&server, "/static/lang/de.json", 200, json!({})).await;
    mount_json(&server, "/api/weather", 200, json!({"temperature": 3.0})).await;
    mount_json(&server, "/static/fast_timetable.json", 200, json!({})).await;
    mount_json(
        &server,
        "/api/isy/status",
        200,
        json!({"logged_in": true, "username": "max"}),
    )
    .await;
    mount_json(
        &server,
        "/api/isy/dashboard-messages",
        401,
        json!({"login_required": true}),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(true);
    let mut app = new_app();

    let initial = c.start(Instant::now(), &app);
    run_all(&client, &mut c, &mut app, initial, wall(7, 0)).await;

    assert!(!app.isy.logged_in);
    assert!(app.isy.username.is_none());
    assert_eq!(
        app.notices.back().map(String::as_str),
        Some("Sitzung abgelaufen, bitte erneut anmelden")
    );
}

#[tokio::test]
async fn test_chat_round_trip_through_dispatcher() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Um 09:40."})))
        .mount(&server)
        .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(client_for(&server), tx, tokio::runtime::Handle::current());
    let mut c = coordinator(false);
    let mut app = new_app();

    dispatcher.dispatch_all(c.handle(
        Command::SendChat("Wann ist Pause?".into()),
        &mut app,
        wall(7, 0),
    ));
    assert_eq!(app.chat.pending.as_deref(), Some("Wann ist Pause?"));

    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("outcome within timeout")
        .expect("channel open");
    c.apply(outcome, &mut app, wall(7, 0));

    assert!(app.chat.pending.is_none());
    let contents: Vec<&str> = app.chat.history.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, vec!["Wann ist Pause?", "Um 09:40."]);
}

#[tokio::test]
async fn test_weekly_overlay_loads_on_demand() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/weekly",
        200,
        json!({"weekly_schedule": [{"date": "2025-11-17", "lessons": []}]}),
    )
    .await;

    let client = client_for(&server);
    let mut c = coordinator(false);
    let mut app = new_app();

    let requests = c.handle(Command::OpenWeekly, &mut app, wall(7, 0));
    assert!(app.show_weekly);
    assert!(app.weekly.is_loading());
    for request in requests {
        let outcome = execute(&client, request).await;
        c.apply(outcome, &mut app, wall(7, 0));
    }
    assert_eq!(
        app.weekly.ready().map(|w| w.weekly_schedule.len()),
        Some(1)
    );
}
