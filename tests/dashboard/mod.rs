//! Integration tests for the dashboard refresh flow.
//!
//! These tests drive the coordinator against a mocked backend and verify
//! cross-module behavior: startup ordering, stale-result rejection, error
//! isolation per widget, exam reminders, preference persistence, and the
//! rendered frame.

mod preferences;
mod refresh_flow;
mod rendering;

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use school_dashboard::coordinator::dispatch::execute;
use school_dashboard::prefs::Preferences;
use school_dashboard::tui::app::App;
use school_dashboard::{ApiClient, Coordinator, DashboardConfig, FetchRequest};

/// Friday 2025-11-14 at `h:m` UTC.
pub fn wall(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 14, h, m, 0)
        .single()
        .expect("valid test time")
}

/// Timetable body with one next lesson and optional exams.
pub fn timetable_body(summary: &str, start: &str, end: &str, exams: Value) -> Value {
    json!({
        "current_lesson": null,
        "next_lesson": {"summary": summary, "start": start, "end": end, "location": "B12"},
        "todays_lessons": [
            {"summary": summary, "start": start, "end": end, "location": "B12"}
        ],
        "exams": exams
    })
}

/// Mounts a JSON responder for `GET route`.
pub async fn mount_json(server: &MockServer, route: &str, status: u16, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the endpoints every startup touches with neutral bodies.
pub async fn mount_startup_defaults(server: &MockServer) {
    mount_json(server, "/static/lang/de.json", 200, json!({})).await;
    mount_json(server, "/static/lang/en.json", 200, json!({})).await;
    mount_json(server, "/api/isy/status", 200, json!({"logged_in": false})).await;
    mount_json(
        server,
        "/api/weather",
        200,
        json!({"temperature": 7.4, "feels_like": 5.1, "humidity": 81,
               "wind_speed": 3.6, "icon": "04d", "description": "Bedeckt"}),
    )
    .await;
}

pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(2)).expect("client must build")
}

pub fn new_app() -> App {
    App::new(Preferences::default(), None)
}

pub fn coordinator(fast_load: bool) -> Coordinator {
    let mut config = DashboardConfig::default();
    config.refresh.fast_load = fast_load;
    Coordinator::new(&config)
}

/// Executes every request and applies the outcomes in order, following up
/// on any requests the outcomes produce.
pub async fn run_all(
    client: &ApiClient,
    coordinator: &mut Coordinator,
    app: &mut App,
    requests: Vec<FetchRequest>,
    now: DateTime<Utc>,
) {
    let mut queue = requests;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for request in queue {
            let outcome = execute(client, request).await;
            next.extend(coordinator.apply(outcome, app, now));
        }
        queue = next;
    }
}
