// crates/editor/src/hot_reload.rs

use std::path::{Path, PathBuf};

use crossbeam_channel::{Receiver, TryRecvError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// Watches a level file for edits. Editors often save by replacing the file,
/// so the parent directory is watched and events are filtered by file name.
pub struct LevelWatcher {
    path: PathBuf,
    events: Receiver<notify::Result<Event>>,
    // Dropping the watcher stops the notifications.
    _watcher: RecommendedWatcher,
}

impl LevelWatcher {
    pub fn new(path: &Path) -> notify::Result<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.send(res);
        })?;

        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(dir = %dir.display(), "watching for level edits");

        Ok(Self {
            path: path.to_path_buf(),
            events: rx,
            _watcher: watcher,
        })
    }

    /// Drain pending notifications. True if any of them touched the level.
    pub fn poll_changed(&self) -> bool {
        let mut changed = false;
        loop {
            match self.events.try_recv() {
                Ok(Ok(event)) => changed |= self.is_relevant(&event),
                Ok(Err(err)) => warn!(%err, "file watcher error"),
                Err(TryRecvError::Empty) => return changed,
                Err(TryRecvError::Disconnected) => {
                    warn!("file watcher stopped");
                    return changed;
                }
            }
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return false;
        }
        let name = self.path.file_name();
        event.paths.iter().any(|p| p.file_name() == name)
    }
}
