//! Live reload of the open guide.
//!
//! The parent directory is watched, not the file, so saves that rename a temp
//! file over the guide are still seen.

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(150);

/// Trailing-edge debounce: a burst of changes fires once, after the last
/// change has been quiet for the debounce window.
#[derive(Debug)]
struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Note a change at `now`, pushing the deadline back.
    fn record(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether a recorded change is due. A due change is consumed.
    fn take_ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

pub struct FileWatcher {
    // Dropping the watcher ends the watch.
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    target: PathBuf,
    debouncer: Debouncer,
}

impl FileWatcher {
    /// Start watching `path` for changes.
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(dir = %dir.display(), file = %target.display(), "watching for changes");

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            target,
            debouncer: Debouncer::new(DEBOUNCE),
        })
    }

    /// Drain pending events. Returns `true` once the guide has changed and no
    /// further change arrived within the debounce window. Changes seen while
    /// waiting are never dropped; they only delay the reload.
    pub fn check_for_changes(&mut self) -> bool {
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) if self.is_relevant(&event) => self.debouncer.record(Instant::now()),
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::debug!(error = %e, "watch error"),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        self.debouncer.take_ready(Instant::now())
    }

    fn is_relevant(&self, event: &Event) -> bool {
        is_content_change(&event.kind) && event.paths.iter().any(|p| same_file(p, &self.target))
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Access(AccessKind::Close(AccessMode::Write))
            | EventKind::Create(_)
    )
}

fn same_file(event_path: &Path, target: &Path) -> bool {
    event_path == target
}
