use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::event::KeyEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod ai;
mod app;
mod cli;
mod config;
mod db;
mod error;
mod models;
mod services;
mod state;
mod tui;

use app::App;
use cli::{Cli, Command};
use config::Config;
use error::Result;
use models::NewsResult;
use services::TrackRequest;
use tui::{draw, handle_key_event};

const WRAP_WIDTH: usize = 100;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only show warnings and errors by default)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::load()?;

    // Initialize app
    let mut app = App::new(&config).await?;

    // Headless commands print and exit
    if let Some(command) = cli.command {
        return run_headless(&mut app, &config, command).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_headless(app: &mut App, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Track {
            topic,
            language,
            sources,
            epapers,
            context,
        } => {
            let mut request =
                TrackRequest::topic(&topic, language.unwrap_or(config.default_language));
            request.selected_sources = sources;
            request.include_epapers = epapers;
            request.context = context;

            let result = app.track_blocking(request).await?;
            print_result(&result);
        }

        Command::Wire { language } => {
            let request = TrackRequest::wire(language.unwrap_or(config.default_language));
            let result = app.track_blocking(request).await?;
            print_result(&result);
        }

        Command::Dispatch => {
            let report = app.dispatch_blocking().await?;
            for result in &report.results {
                print_result(result);
            }
            println!(
                "Daily dispatch: {} reports filed, {} topics failed",
                report.results.len(),
                report.failures
            );
        }
    }

    Ok(())
}

fn print_result(result: &NewsResult) {
    println!("{}", "=".repeat(WRAP_WIDTH));
    println!("{} [{}] {}", result.topic, result.language, result.timestamp.to_rfc3339());
    println!("{}", "-".repeat(WRAP_WIDTH));
    for line in result.summary.lines() {
        println!("{}", textwrap::fill(line, WRAP_WIDTH));
    }
    if !result.sources.is_empty() {
        println!();
        println!("Sources:");
        for (i, source) in result.sources.iter().enumerate() {
            println!("{:>3}. {} <{}>", i + 1, source.title, source.uri);
        }
    }
    println!();
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Apply completed dispatches and scan progress
        app.poll_desk_messages().await;

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.input_mode, app.show_help) {
                        let should_quit = app.handle_action(action).await?;
                        if should_quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
