//! Logging init: append to a file under the XDG state dir, or fall back to
//! stderr when that is not possible (or when the user asked for verbose
//! console output).

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,ytcd_core=debug,ytcd=debug";

/// Path of the log file: `~/.local/state/ytcd/ytcd.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytcd")?;
    Ok(xdg_dirs.get_state_home().join("ytcd.log"))
}

fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize structured logging to `~/.local/state/ytcd/ytcd.log`.
/// Returns Err if the file cannot be opened so the caller can use stderr.
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("create log directory {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(DEFAULT_FILTER))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install log subscriber: {e}"))?;

    tracing::info!("ytcd logging initialized at {}", path.display());
    Ok(())
}

/// Initialize logging to stderr only. `verbose` lowers the default filter
/// to debug for every target, yt-dlp passthrough included.
pub fn init_logging_stderr(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_FILTER };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(fallback))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
