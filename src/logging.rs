//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so while it runs logs go to a file; one-shot CLI
//! commands log to stderr.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "clinicalthread=info";

/// Log file name inside the configured log directory
pub const LOG_FILE: &str = "clinicalthread.log";

/// Where log records are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl LogTarget {
    /// File target for the given log directory
    pub fn in_dir(dir: &Path) -> Self {
        LogTarget::File(dir.join(LOG_FILE))
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place. Returns an error only when the log file cannot be opened.
pub fn setup_logging(target: LogTarget) -> std::io::Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true);

    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    Ok(())
}
