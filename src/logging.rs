// File logging.
// Writes tracing output to <cache dir>/ghx/ghx.log so it never touches the terminal.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "ghx.log";

/// Directory holding the log file.
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ghx").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Open the log file in `dir` for appending, creating both as needed.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
}

/// Install the global subscriber. Keep the guard alive until exit.
///
/// Logging is disabled when the file cannot be opened; stderr would draw
/// over the UI.
pub fn init() -> Option<WorkerGuard> {
    let dir = log_dir()?;
    let file = open_log_file(&dir).ok()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .init();

    tracing::info!(path = %dir.join(LOG_FILE).display(), "logging initialized");
    Some(guard)
}
