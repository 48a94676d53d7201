use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a CLI command or a TUI save waits for another writer
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const FIRST_RETRY: Duration = Duration::from_millis(5);
const MAX_RETRY: Duration = Duration::from_millis(100);

/// Exclusive hold on `board/.lock` for one load-modify-save cycle.
///
/// The lock file itself is left in place: every writer contends on the same
/// inode, and the kernel drops the `flock` when the handle closes.
pub struct FileLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("board is locked by another tb process (gave up after {} ms)", .waited.as_millis())]
    Busy { path: PathBuf, waited: Duration },
}

impl FileLock {
    /// Lock the board, retrying with growing pauses until `timeout` passes.
    pub fn acquire(board_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path(board_dir);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::Open {
                path: path.clone(),
                source,
            })?;

        let start = Instant::now();
        let mut pause = FIRST_RETRY;
        while !try_flock(&file) {
            let waited = start.elapsed();
            if waited >= timeout {
                tracing::warn!(path = %path.display(), ?waited, "board lock busy");
                return Err(LockError::Busy { path, waited });
            }
            std::thread::sleep(pause.min(timeout - waited));
            pause = (pause * 2).min(MAX_RETRY);
        }
        tracing::trace!(waited = ?start.elapsed(), "board lock held");
        Ok(FileLock { _file: file })
    }

    pub fn acquire_default(board_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(board_dir, DEFAULT_TIMEOUT)
    }
}

pub fn lock_path(board_dir: &Path) -> PathBuf {
    board_dir.join(".lock")
}

#[cfg(unix)]
fn try_flock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the whole call
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_relock_after_drop() {
        let tmp = TempDir::new().unwrap();
        let held = FileLock::acquire_default(tmp.path()).unwrap();
        assert!(lock_path(tmp.path()).exists());
        drop(held);
        assert!(FileLock::acquire(tmp.path(), Duration::from_millis(20)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_second_writer_gives_up_when_busy() {
        let tmp = TempDir::new().unwrap();
        let _held = FileLock::acquire_default(tmp.path()).unwrap();
        match FileLock::acquire(tmp.path(), Duration::from_millis(40)) {
            Err(LockError::Busy { waited, .. }) => assert!(waited >= Duration::from_millis(40)),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("lock should be busy"),
        }
    }

    #[test]
    fn test_missing_board_dir_is_an_open_error() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("no-board");
        assert!(matches!(
            FileLock::acquire_default(&gone),
            Err(LockError::Open { .. })
        ));
    }
}
