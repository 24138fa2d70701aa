//! # Widget: Weather
//!
//! ## Responsibility
//! Current conditions as the backend reports them: temperature, condition
//! text, feels-like, humidity and wind speed. A backend error replaces the
//! whole widget with the error headline and optional detail.
//!
//! ## Guarantees
//! - Values are printed as received, without rounding
//! - An unknown icon code falls back to a neutral glyph

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{muted, placeholder};
use crate::api::types::{Weather, WeatherReport};
use crate::tui::app::App;

/// Terminal glyph for an OpenWeather icon code such as `"04d"`.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon.get(..2) {
        Some("01") => "\u{2600}",          // ☀
        Some("02") => "\u{26c5}",          // ⛅
        Some("03") | Some("04") => "\u{2601}", // ☁
        Some("09") | Some("10") => "\u{2614}", // ☔
        Some("11") => "\u{26a1}",          // ⚡
        Some("13") => "\u{2744}",          // ❄
        Some("50") => "\u{2592}",          // ▒
        _ => "\u{00b7}",
    }
}

fn conditions_lines(app: &App, w: &Weather) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                format!("{} {}°C", icon_glyph(&w.icon), w.temperature),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {}", w.description)),
        ]),
        Line::from(format!(
            "{}: {}°C",
            app.strings.get("feels_like"),
            w.feels_like
        )),
        Line::from(format!("{}: {}%", app.strings.get("humidity"), w.humidity)),
        Line::from(format!(
            "{}: {} m/s",
            app.strings.get("wind_speed"),
            w.wind_speed
        )),
    ]
}

/// Builds the weather lines.
pub fn weather_lines(app: &App) -> Vec<Line<'static>> {
    if let Some(lines) = placeholder(app, &app.weather, "weather_error") {
        return lines;
    }
    match app.weather.ready() {
        Some(WeatherReport::Conditions(w)) => conditions_lines(app, w),
        Some(WeatherReport::Unavailable { error, detail }) => {
            let mut lines = vec![Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))];
            if let Some(detail) = detail {
                lines.push(muted(detail));
            }
            lines
        }
        None => Vec::new(),
    }
}

/// Renders the weather widget.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(format!(" {} ", app.strings.get("weather")))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let para = Paragraph::new(weather_lines(app))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use crate::prefs::Preferences;
    use crate::tui::app::Loadable;
    use crate::tui::widgets::line_text;

    fn texts(app: &App) -> Vec<String> {
        weather_lines(app).iter().map(line_text).collect()
    }

    #[test]
    fn test_conditions_rendered_verbatim() {
        let mut app = App::new(Preferences::default(), None);
        app.weather = Loadable::Ready(WeatherReport::Conditions(Weather {
            temperature: 7.4,
            feels_like: 5.1,
            humidity: 81.0,
            wind_speed: 3.6,
            icon: "04d".into(),
            description: "Bedeckt".into(),
        }));
        assert_eq!(
            texts(&app),
            vec![
                "\u{2601} 7.4°C  Bedeckt",
                "Gefühlt: 5.1°C",
                "Luftfeuchtigkeit: 81%",
                "Windgeschwindigkeit: 3.6 m/s"
            ]
        );
    }

    #[test]
    fn test_backend_error_shows_only_error() {
        let mut app = App::new(Preferences::default(), None);
        app.weather = Loadable::Ready(WeatherReport::Unavailable {
            error: "OpenWeather API key not configured".into(),
            detail: Some("Please set OPENWEATHER_API_KEY".into()),
        });
        assert_eq!(
            texts(&app),
            vec![
                "OpenWeather API key not configured",
                "Please set OPENWEATHER_API_KEY"
            ]
        );
    }

    #[test]
    fn test_labels_follow_language() {
        let mut app = App::new(Preferences::default(), None);
        app.strings.set_language(Language::En);
        app.weather = Loadable::Ready(WeatherReport::Conditions(Weather {
            temperature: 20.0,
            feels_like: 21.5,
            humidity: 40.0,
            wind_speed: 1.0,
            icon: "01d".into(),
            description: "clear sky".into(),
        }));
        assert_eq!(texts(&app)[1], "Feels like: 21.5°C");
    }

    #[test]
    fn test_icon_glyph_fallback() {
        assert_eq!(icon_glyph("01n"), "\u{2600}");
        assert_eq!(icon_glyph(""), "\u{00b7}");
        assert_eq!(icon_glyph("zz"), "\u{00b7}");
    }
}
