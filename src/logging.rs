//! Tracing setup
//!
//! CLI runs log to stderr. The TUI owns the terminal, so it logs to a file
//! under the cache directory instead.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Where TUI logs go (~/.cache/repackgrab/repackgrab.log)
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join("repackgrab").join("repackgrab.log"))
}

/// Filter from `RUST_LOG`, falling back to our own default level
pub fn env_filter(quiet: bool) -> EnvFilter {
    let default = if quiet { "warn" } else { "repackgrab=info,warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Log to stderr
pub fn init_stderr(quiet: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(quiet))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Log to the TUI log file; logging is disabled if it cannot be opened
pub fn init_file(quiet: bool) -> Option<PathBuf> {
    let path = log_file_path()?;
    let file = open_log_file(&path).ok()?;

    let _ = tracing_subscriber::registry()
        .with(env_filter(quiet))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Some(path)
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_under_cache_dir() {
        if let Some(path) = log_file_path() {
            assert!(path.ends_with("repackgrab/repackgrab.log"));
        }
    }

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
