//! Preference persistence across restarts.

use std::time::Instant;

use school_dashboard::i18n::Language;
use school_dashboard::prefs::Preferences;
use school_dashboard::tui::app::App;
use school_dashboard::{Command, FetchRequest};

use super::{coordinator, wall};

#[test]
fn test_language_toggle_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("school-dashboard").join("preferences.json");

    let mut app = App::new(Preferences::default(), Some(path.clone()));
    let mut c = coordinator(false);
    let requests = c.handle(Command::ToggleLanguage, &mut app, wall(7, 0));
    assert_eq!(
        requests,
        vec![FetchRequest::Language {
            language: Language::En
        }]
    );

    // Restart with what was saved.
    let restored = Preferences::load(&path).expect("saved preferences load");
    assert_eq!(restored.language, Language::En);
    let app = App::new(restored, Some(path));
    assert_eq!(app.strings.get("next_lesson"), "Next lesson");

    let mut c = coordinator(false);
    let initial = c.start(Instant::now(), &app);
    assert!(initial.contains(&FetchRequest::Language {
        language: Language::En
    }));
}

#[test]
fn test_notifications_toggle_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("preferences.json");

    let mut app = App::new(Preferences::default(), Some(path.clone()));
    let mut c = coordinator(false);
    c.handle(Command::ToggleNotifications, &mut app, wall(7, 0));

    let restored = Preferences::load(&path).expect("saved preferences load");
    assert!(restored.notifications);
    assert_eq!(restored.language, Language::De);
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prefs = Preferences::load(&dir.path().join("nope.json")).expect("defaults");
    assert_eq!(prefs, Preferences::default());
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "{ not json").expect("write");
    let err = Preferences::load(&path).expect_err("corrupt file must fail");
    assert!(err.to_string().contains("preferences.json"));
}
