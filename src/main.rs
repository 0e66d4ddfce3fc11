use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::str::FromStr;

use markvault_app::App;
use markvault_bookmarks::Vault;
use markvault_config::Config;
use markvault_logger::LogLevel;

fn main() -> Result<()> {
    // Load config first; a broken config file falls back to defaults.
    let config = Config::load().unwrap_or_default();

    let min_level = LogLevel::from_str(&config.logging.min_level).unwrap_or(LogLevel::Info);
    match config.log_file_path() {
        Ok(path) => markvault_logger::init(path, min_level),
        Err(e) => eprintln!("Warning: file logging disabled: {e}"),
    }
    markvault_logger::info("Popup opened");

    let vault = Vault::new(config.vault_dir()?);

    // Bootstrap before touching the terminal so a markup/registry
    // mismatch reports as a plain error instead of a garbled screen.
    let mut app = App::new(&config, vault)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run application
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print error if there was one
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}
