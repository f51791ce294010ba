//! # studymd
//!
//! A terminal viewer for long markdown study guides.
//!
//! ## Usage
//!
//! Open the interactive TUI:
//! ```sh
//! studymd guide.md
//! ```
//!
//! List sections with visited markers:
//! ```sh
//! studymd -l guide.md
//! ```
//!
//! Print one section:
//! ```sh
//! studymd -s section-3 guide.md
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::Cli;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use studymd::store::{FileStore, KeyValueStore, MemoryStore};
use studymd::{Config, Navigator, parser};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    // Handle dynamic shell completions
    #[cfg(feature = "unstable-dynamic")]
    clap_complete::CompleteEnv::with_factory(|| {
        use clap::CommandFactory;
        Cli::command()
    })
    .complete();

    let args = Cli::parse();
    let interactive = args.is_interactive();
    init_tracing(args.log_file.as_deref(), interactive)?;

    let config = Config::load();
    let guide = parser::parse_file(&args.file)
        .wrap_err_with(|| format!("failed to read {}", args.file.display()))?;
    if guide.is_empty() {
        tracing::warn!(path = %args.file.display(), "no numbered sections found");
    }
    let store = open_store(&args, &config);

    if !interactive {
        let mut nav = Navigator::new(guide.sections, store);
        if let Some(theme) = args.theme {
            nav.set_theme(theme.into());
        }
        if let Some(ref query) = args.search {
            nav.set_search_query(query.as_str());
        }
        cli::handle_cli_mode(&args, &mut nav);
        return Ok(());
    }

    let file_path = args
        .file
        .canonicalize()
        .unwrap_or_else(|_| args.file.clone());
    let mut app = studymd::App::new(guide, file_path, config, store);
    if let Some(theme) = args.theme {
        app.set_theme(theme.into());
    }
    if let Some(ref query) = args.search {
        app.set_search_query(query);
    }

    // Manual init so a failure leaves the terminal usable
    use crossterm::ExecutableCommand;
    use crossterm::terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    };
    use std::io::stdout;

    enable_raw_mode().wrap_err("failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen).inspect_err(|_| {
        disable_raw_mode().ok();
    })?;

    let backend = ratatui::backend::CrosstermBackend::new(stdout());
    let mut terminal = ratatui::Terminal::new(backend).inspect_err(|_| {
        stdout().execute(LeaveAlternateScreen).ok();
        disable_raw_mode().ok();
    })?;

    let result = studymd::tui::run(&mut terminal, app);

    // Cleanup terminal state
    stdout().execute(LeaveAlternateScreen).ok();
    disable_raw_mode().ok();

    result
}

/// Log to `--log-file` when given. Otherwise the TUI logs nothing (output
/// would land on the alternate screen) and other modes log to stderr.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = if interactive && log_file.is_none() {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// State file precedence: `--state-file` > `storage.state_file` > data dir.
/// Without any usable location progress is kept for this session only.
fn open_store(args: &Cli, config: &Config) -> Box<dyn KeyValueStore> {
    let explicit = args
        .state_file
        .clone()
        .or_else(|| config.storage.state_file.clone());

    let store = match explicit {
        Some(path) => FileStore::open(path),
        None => match FileStore::open_default() {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "progress will not be saved");
                return Box::new(MemoryStore::new());
            }
        },
    };
    tracing::debug!(path = %store.path().display(), "using state file");
    Box::new(store)
}
