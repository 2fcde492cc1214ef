// cppad: multi-tab C++ playground for the terminal

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};

use cppad::compile::{CompileClient, HttpBackend};
use cppad::config::Config;
use cppad::debug;
use cppad::editor::EditorBindings;
use cppad::tabs::{TabId, TabRegistry};
use cppad::theme::{FilePreferenceStore, ThemeMode, ThemeStore};
use cppad::ui::App;

/// cppad - edit, compile and run C++ snippets in tabs
#[derive(Parser)]
#[command(name = "cppad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source files to open, one tab each
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Compile service URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Theme for this run only; the saved preference is left alone
    #[arg(long, value_name = "light|dark")]
    theme: Option<ThemeMode>,

    /// Log level for the debug log file
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    debug::init(cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;

    let registry = open_tabs(&cli.files)?;

    let preferences = FilePreferenceStore::new(Config::state_path());
    log::info!("Preferences file: {:?}", preferences.path());
    let mut theme = ThemeStore::load(Box::new(preferences), ThemeMode::from_environment());
    if let Some(mode) = cli.theme {
        theme.override_mode(mode);
    }

    let endpoint = cli.endpoint.unwrap_or_else(|| config.endpoint.clone());
    let backend = HttpBackend::new(endpoint, config.request_timeout(), config.max_response_bytes);
    log::info!("Compile endpoint: {}", backend.endpoint());
    let client = CompileClient::new(Arc::new(backend));
    let bindings = EditorBindings::new(config.tab_width);

    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Create and run app
    let mut app = App::new(registry, bindings, client, theme, config.export_dir.clone());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("UI loop failed: {}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// One tab per file, named after the file. With no files, the default tab stays.
fn open_tabs(files: &[PathBuf]) -> Result<TabRegistry> {
    let mut registry = TabRegistry::new();
    if files.is_empty() {
        return Ok(registry);
    }

    let starter = registry.active_id();
    let mut first: Option<TabId> = None;
    for path in files {
        let code = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let id = registry.create_tab_with(name, code);
        first.get_or_insert(id);
    }

    registry
        .close_tab(starter)
        .context("Failed to replace the starter tab")?;
    if let Some(id) = first {
        registry.set_active_tab(id)?;
    }
    Ok(registry)
}
