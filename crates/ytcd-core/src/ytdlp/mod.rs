//! Shared plumbing for invoking the external `yt-dlp` program.
//!
//! Both the channel enumerator and the fetch executor shell out to yt-dlp;
//! this module locates the binary and builds the common part of every
//! command line (cookies, warning suppression).

mod info;

pub use info::InfoJson;

use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Failure to find a runnable yt-dlp.
#[derive(Debug, thiserror::Error)]
#[error("yt-dlp not found: {0}")]
pub struct LocateError(String);

/// Handle to a yt-dlp binary plus process-wide invocation options.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    verbose: bool,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            verbose: false,
        }
    }

    /// Use `configured` if given, otherwise search PATH for `yt-dlp`.
    pub fn locate(configured: Option<&Path>) -> Result<Self, LocateError> {
        if let Some(path) = configured {
            if path.is_file() {
                return Ok(Self::new(path));
            }
            return Err(LocateError(format!(
                "configured path {} does not exist",
                path.display()
            )));
        }
        which::which("yt-dlp")
            .map(Self::new)
            .map_err(|e| {
                LocateError(format!(
                    "{e}; install yt-dlp or set yt_dlp_path in config.toml"
                ))
            })
    }

    /// Pass yt-dlp's own warnings through instead of suppressing them.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Base command with cookie and verbosity options applied.
    pub(crate) fn command(&self, cookies: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.binary);
        if !self.verbose {
            cmd.arg("--no-warnings");
        }
        if let Some(cookies) = cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.kill_on_drop(true);
        cmd
    }
}

/// Pick the most informative message from yt-dlp's stderr: the last
/// `ERROR:` line, else the last non-empty line.
pub(crate) fn error_message(stderr_lines: &[String]) -> String {
    stderr_lines
        .iter()
        .rev()
        .find_map(|l| l.trim().strip_prefix("ERROR:").map(|m| m.trim().to_string()))
        .or_else(|| {
            stderr_lines
                .iter()
                .rev()
                .map(|l| l.trim())
                .find(|l| !l.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "yt-dlp exited without an error message".to_string())
}
