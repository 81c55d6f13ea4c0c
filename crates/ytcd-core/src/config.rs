use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::retry::RetryPolicy;

/// Backoff for ledger appends (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per ledger append (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: std::time::Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: std::time::Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/ytcd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YtcdConfig {
    /// Default directory for downloaded videos and the metadata ledger.
    pub output_dir: PathBuf,
    /// yt-dlp format selector; the first alternative that matches wins.
    pub format: String,
    /// Container used when yt-dlp merges separate video and audio streams.
    /// Also the extension of every planned destination file.
    pub merge_output_format: String,
    /// Name of the CSV ledger inside the output directory.
    pub ledger_file: String,
    /// Explicit yt-dlp binary; if missing, `yt-dlp` is looked up on PATH.
    #[serde(default)]
    pub yt_dlp_path: Option<PathBuf>,
    /// Minimum milliseconds between progress lines printed by the CLI.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    /// Optional ledger retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

fn default_progress_interval_ms() -> u64 {
    500
}

impl Default for YtcdConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("downloads"),
            format: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/bestvideo+bestaudio/best".to_string(),
            merge_output_format: "mp4".to_string(),
            ledger_file: "videos_metadata.csv".to_string(),
            yt_dlp_path: None,
            progress_interval_ms: default_progress_interval_ms(),
            retry: None,
        }
    }
}

impl YtcdConfig {
    /// Retry policy for ledger appends (config section or defaults).
    pub fn ledger_retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ytcd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<YtcdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = YtcdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: YtcdConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config_values() {
        let cfg = YtcdConfig::default();
        assert_eq!(cfg.output_dir, PathBuf::from("downloads"));
        assert_eq!(cfg.merge_output_format, "mp4");
        assert_eq!(cfg.ledger_file, "videos_metadata.csv");
        assert!(cfg.format.starts_with("bestvideo"));
        assert!(cfg.yt_dlp_path.is_none());
        assert_eq!(cfg.progress_interval_ms, 500);
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = YtcdConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: YtcdConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.output_dir, cfg.output_dir);
        assert_eq!(parsed.format, cfg.format);
        assert_eq!(parsed.ledger_file, cfg.ledger_file);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            output_dir = "/srv/videos"
            format = "best"
            merge_output_format = "mkv"
            ledger_file = "ledger.csv"
            yt_dlp_path = "/opt/yt-dlp"
        "#;
        let cfg: YtcdConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/srv/videos"));
        assert_eq!(cfg.format, "best");
        assert_eq!(cfg.merge_output_format, "mkv");
        assert_eq!(cfg.yt_dlp_path, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(cfg.progress_interval_ms, 500);
        assert!(cfg.retry.is_none());
    }

    #[test]
    fn config_toml_retry_section() {
        let toml = r#"
            output_dir = "downloads"
            format = "best"
            merge_output_format = "mp4"
            ledger_file = "videos_metadata.csv"
            progress_interval_ms = 250

            [retry]
            max_attempts = 3
            base_delay_secs = 0.5
            max_delay_secs = 15
        "#;
        let cfg: YtcdConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.progress_interval_ms, 250);
        let policy = cfg.ledger_retry_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(15));
    }

    #[test]
    fn missing_retry_section_uses_defaults() {
        let policy = YtcdConfig::default().ledger_retry_policy();
        assert_eq!(policy.max_attempts, RetryConfig::default().max_attempts);
    }
}
