//! # Binary: School Dashboard
//!
//! ## Responsibility
//! Entry point for the terminal dashboard. Loads configuration and
//! preferences, starts the backend fetch runtime, and runs the UI loop that
//! owns all display state.
//!
//! ## Usage
//! ```bash
//! cargo run --bin dashboard
//! cargo run --bin dashboard -- --config dashboard.toml
//! cargo run --bin dashboard -- --base-url http://raspberrypi.local:5000
//! cargo run --bin dashboard -- --print-config-schema > dashboard.schema.json
//! ```
//!
//! ## Guarantees
//! - Terminal state always restored on exit, even on panic
//! - Clean shutdown on q, Esc, or Ctrl+C
//! - A failing backend never stops the UI loop

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

use school_dashboard::config::{export_schema, loader};
use school_dashboard::coordinator::Dispatcher;
use school_dashboard::prefs::{self, Preferences};
use school_dashboard::tui::app::{App, LogLevel};
use school_dashboard::tui::events::{apply_event, poll_event};
use school_dashboard::tui::ui;
use school_dashboard::{init_tracing, ApiClient, Coordinator, DashboardConfig, FetchOutcome};

/// Input poll timeout: 10 frames per second.
const TICK_RATE: Duration = Duration::from_millis(100);

/// CLI arguments for the dashboard binary.
#[derive(Default)]
struct CliArgs {
    /// TOML config file.
    config: Option<PathBuf>,
    /// Overrides `backend.base_url`.
    base_url: Option<String>,
    /// Print the config JSON Schema and exit.
    print_schema: bool,
}

/// Parses command-line arguments.
///
/// # Returns
/// Parsed `CliArgs`; unknown arguments are ignored.
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                if let Some(path) = args.get(i) {
                    cli.config = Some(PathBuf::from(path));
                }
            }
            "--base-url" => {
                i += 1;
                if let Some(url) = args.get(i) {
                    cli.base_url = Some(url.clone());
                }
            }
            "--print-config-schema" => cli.print_schema = true,
            _ => {}
        }
        i += 1;
    }

    cli
}

/// Sets up the terminal for TUI rendering.
///
/// # Errors
/// Returns `io::Error` if terminal initialization fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, event::EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restores the terminal to its original state.
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn load_config(cli: &CliArgs) -> Result<DashboardConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => loader::load_from_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
        loader::ensure_valid(&config)?;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args();

    if cli.print_schema {
        println!("{}", export_schema()?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    // Never stderr: it shares the tty with the alternate screen. Without a
    // writable location the dashboard runs without a log file.
    if let Some(log_path) = config.observability.log_path() {
        if let Some(dir) = log_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        init_tracing(&config.observability.log_format, Some(&log_path))?;
    }

    let prefs_path = config
        .storage
        .preferences_path
        .clone()
        .or_else(prefs::default_path);
    let (prefs, prefs_error) = match prefs_path.as_deref().map(Preferences::load) {
        Some(Ok(prefs)) => (prefs, None),
        Some(Err(e)) => (Preferences::default(), Some(e)),
        None => (Preferences::default(), None),
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;
    let client = ApiClient::new(
        config.backend.base_url.clone(),
        config.backend.request_timeout(),
    )?;
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(client, tx, rt.handle().clone());

    info!(base_url = %config.backend.base_url, "dashboard starting");

    // Install panic hook that restores terminal before printing panic message
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            LeaveAlternateScreen,
            event::DisableMouseCapture
        );
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(prefs, prefs_path);
    if let Some(e) = prefs_error {
        warn!(error = %e, "preferences unreadable, using defaults");
        app.log(LogLevel::Warn, e.to_string(), String::new());
    }
    let mut coordinator = Coordinator::new(&config);

    let result = run(&mut terminal, &mut app, &mut coordinator, &dispatcher, rx);

    coordinator.stop();
    restore_terminal(&mut terminal)?;
    rt.shutdown_timeout(Duration::from_millis(500));

    if let Err(e) = result {
        eprintln!("dashboard error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Runs the UI loop until the user quits.
///
/// Each iteration draws, handles at most one input event, applies every fetch
/// outcome that has arrived, then lets the scheduler fire due tasks.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    coordinator: &mut Coordinator,
    dispatcher: &Dispatcher,
    mut rx: mpsc::UnboundedReceiver<FetchOutcome>,
) -> Result<(), Box<dyn std::error::Error>> {
    dispatcher.dispatch_all(coordinator.start(Instant::now(), app));

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let event = poll_event(TICK_RATE, app.input_mode);
        if let Some(command) = apply_event(app, event) {
            dispatcher.dispatch_all(coordinator.handle(command, app, Utc::now()));
        }

        if app.should_quit {
            break;
        }

        while let Ok(outcome) = rx.try_recv() {
            dispatcher.dispatch_all(coordinator.apply(outcome, app, Utc::now()));
        }

        dispatcher.dispatch_all(coordinator.tick(Instant::now(), Utc::now(), app));
    }

    info!("dashboard stopped");
    Ok(())
}
