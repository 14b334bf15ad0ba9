//! repackgrab - find game repacks and download them
//!
//! Searches provider catalogs on disk together with FitGirl Repacks, ranks
//! the matches and downloads the chosen release over BitTorrent.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! repackgrab
//!
//! # CLI mode (for automation)
//! repackgrab search "doom 3"
//! repackgrab download "doom 3" --index 1 --path ~/Games
//! repackgrab library list --json
//! ```

use std::io::{stdout, Stdout};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use repackgrab::app::App;
use repackgrab::cli::{Cli, Command, ExitCode, Output};
use repackgrab::commands::{self, Context};
use repackgrab::config::Config;
use repackgrab::logging;
use repackgrab::providers::Providers;
use repackgrab::tasks::{spawn_action, Services};
use repackgrab::ui::render_ui;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(ref dir) = cli.catalog_dir {
        config.catalog_dir = Some(dir.clone());
    }

    if cli.is_cli_mode() {
        logging::init_stderr(cli.quiet);
        let exit_code = run_cli(cli, config).await;
        std::process::exit(exit_code.into());
    } else {
        if let Some(path) = logging::init_file(cli.quiet) {
            eprintln!("Logging to {}", path.display());
        }
        run_tui(config, cli.config).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: Config) -> ExitCode {
    let output = Output::new(&cli);
    let ctx = Context::new(config, cli.config.clone());

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &ctx, &output).await,
        Some(Command::Download(cmd)) => commands::download_cmd(cmd, &ctx, &output).await,
        Some(Command::Fetch(cmd)) => commands::fetch_cmd(cmd, &ctx, &output).await,
        Some(Command::Providers(cmd)) => commands::providers_cmd(cmd, &ctx, &output).await,
        Some(Command::Library(cmd)) => commands::library_cmd(cmd, &ctx, &output).await,
        None => ExitCode::Success,
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(config: Config, config_path: Option<std::path::PathBuf>) -> Result<()> {
    let services = Services::from_config(&config, config_path);
    let mut app = App::new(config.games_folder.clone(), config.download_dir());

    let providers = Providers::new(config.catalog_dir());
    if let Err(e) = providers.ensure_dir() {
        app.set_error(format!("Cannot create catalog directory: {}", e));
    } else if providers.is_empty() {
        app.status = Some("No providers set yet. Choose 'Add provider' to get game libraries.".into());
    }
    info!(catalogs = %config.catalog_dir().display(), "Starting TUI");

    let mut terminal = init_terminal()?;
    let result = run_event_loop(&mut terminal, &mut app, &services).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, runs actions, renders UI
async fn run_event_loop(terminal: &mut Tui, app: &mut App, services: &Services) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);
    let (tx, mut rx) = mpsc::unbounded_channel();

    while app.running {
        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        spawn_action(action, services, app.games_folder.clone(), tx.clone());
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            if let Some(action) = app.apply(event) {
                spawn_action(action, services, app.games_folder.clone(), tx.clone());
            }
        }
    }

    Ok(())
}
