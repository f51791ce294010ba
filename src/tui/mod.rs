mod app;
mod help_text;
mod markdown;
pub mod theme;
mod ui;
mod watcher;

pub use app::{App, AppMode};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::Duration;

/// Poll timeout; also how often the file watcher and status timeout are checked.
const TICK: Duration = Duration::from_millis(100);

/// Run the TUI until the user quits.
///
/// Reloads the guide when the file changes on disk. Selection, visited
/// sections, the search query, and the theme survive a reload.
pub fn run(terminal: &mut DefaultTerminal, app: App) -> Result<()> {
    let mut app = app;

    let mut file_watcher = match watcher::FileWatcher::new(app.file_path()) {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "live reload disabled");
            None
        }
    };

    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        if !event::poll(TICK)? {
            if file_watcher.as_mut().is_some_and(|w| w.check_for_changes()) {
                match app.reload() {
                    Ok(()) => app.set_status("↻ Guide reloaded"),
                    Err(e) => {
                        tracing::warn!(path = %app.file_path().display(), error = %e, "reload failed");
                        app.set_status(format!("✗ Reload failed: {}", e));
                    }
                }
            }
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
