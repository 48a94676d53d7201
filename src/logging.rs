//! `tracing` subscriber setup. The filter comes from `TB_LOG` when set,
//! otherwise `warn` (or `debug` with `-v`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TB_LOG";

pub enum LogTarget<'a> {
    /// CLI commands log to stderr alongside their output
    Stderr,
    /// The TUI owns the terminal, so it logs to a file
    File(&'a Path),
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }))
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(target: LogTarget<'_>, verbose: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_target(false);
    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("warning: could not open {}: {}", path.display(), e);
                    return;
                }
            };
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    // Already installed (e.g. tests calling in twice)
    let _ = result;
}
