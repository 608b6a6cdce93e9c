//! Vault Organizer - Entry Point
//!
//! Initializes logging and the terminal, loads the vault and runs the
//! event loop.
//!
//! Usage: `vault-organizer [VAULT_FILE]`. Without a file (and without one in
//! the config) a sample vault is generated.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use vault_organizer::data::{load_vault_or_sample, OrganizerConfig};
use vault_organizer::ui::App;

/// How long to wait for input before redrawing
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    // Log to a file so the TUI stays clean
    let target = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("vault-organizer.log")
    {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(_) => env_logger::Target::Pipe(Box::new(io::sink())),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(target)
        .init();

    log::info!("Starting Vault Organizer v{}", env!("CARGO_PKG_VERSION"));

    let config = OrganizerConfig::load();
    let vault_path = std::env::args().nth(1).map(PathBuf::from).or_else(|| config.vault_path.clone());
    let vault = load_vault_or_sample(vault_path.as_deref(), config.sample_seed);
    let mut app = App::new(vault, &config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Organizer exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    if let Err(e) = app.config(&config).save() {
        log::warn!("Failed to save config: {}", e);
    }

    log::info!("Vault Organizer shut down cleanly");
    result
}

/// Draw, then wait for the next key press
fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events, not releases
                if key.kind == KeyEventKind::Press && app.handle_input(key)? {
                    break;
                }
            }
        }
    }

    Ok(())
}
