use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Files under `board/` whose changes mean the in-memory project is stale
const WATCHED_FILES: &[&str] = &["store.json", "project.toml"];

#[derive(Debug)]
pub enum FileEvent {
    Changed(Vec<PathBuf>),
}

/// Watches `board/` for writes by other `tb` processes.
pub struct BoardWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl BoardWatcher {
    pub fn start(board_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let board_dir_owned = board_dir.to_path_buf();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                if !matches!(
                    event.kind,
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                ) {
                    return;
                }
                let relevant: Vec<PathBuf> = event
                    .paths
                    .into_iter()
                    .filter(|p| is_watched(&board_dir_owned, p))
                    .collect();
                if !relevant.is_empty() {
                    let _ = tx.send(FileEvent::Changed(relevant));
                }
            },
            Config::default(),
        )?;

        watcher.watch(board_dir, RecursiveMode::NonRecursive)?;
        Ok(BoardWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Drain pending events without blocking
    pub fn poll(&self) -> Vec<FileEvent> {
        self.rx.try_iter().collect()
    }
}

/// Whether a changed path is one the board cares about. Temp files from
/// atomic writes, the lock and the logs are ignored.
fn is_watched(board_dir: &Path, path: &Path) -> bool {
    path.parent() == Some(board_dir)
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| WATCHED_FILES.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_watched() {
        let dir = Path::new("/p/board");
        assert!(is_watched(dir, Path::new("/p/board/store.json")));
        assert!(is_watched(dir, Path::new("/p/board/project.toml")));
        assert!(!is_watched(dir, Path::new("/p/board/.lock")));
        assert!(!is_watched(dir, Path::new("/p/board/.recovery.log")));
        assert!(!is_watched(dir, Path::new("/p/board/.tmpA1b2C3")));
        assert!(!is_watched(dir, Path::new("/p/other/store.json")));
    }
}
