//! Onboard TUI - multi-step customer onboarding in the terminal
//!
//! Account registration, a seven-step application wizard with per-section
//! editing and conditional fields, and a review page gating final submission.

mod app;
mod config;
mod i18n;
mod state;
mod submit;
mod ui;
mod wizard;

use anyhow::Result;
use app::App;
use config::OnboardConfig;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use i18n::Translator;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use submit::LoggingSubmitter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onboard_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = OnboardConfig::init_file() {
        tracing::debug!(error = %err, "config template not written");
    }
    let config = OnboardConfig::load().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "using default configuration");
        OnboardConfig::default()
    });
    let mut translator = Translator::embedded()?;
    if let Some(path) = &config.locale_override_path {
        if let Err(err) = translator.merge_file(path) {
            tracing::warn!(error = %err, "ignoring locale override");
        }
    }
    tracing::debug!(entries = translator.len(), "translations loaded");
    let submitter = Arc::new(LoggingSubmitter::from_config(&config));
    let mut app = App::new(translator, submitter, config.start_route());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            // Resize is picked up by the next draw
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        // Results of submissions spawned on the runtime
        app.poll_submissions();

        if app.should_quit() {
            return Ok(());
        }
    }
}
