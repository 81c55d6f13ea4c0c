//! Channel enumeration via `yt-dlp --flat-playlist --dump-single-json`.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;

use crate::ytdlp::{error_message, YtDlp};

use super::channel_url;
use super::parse::{classify_listing_error, parse_listing};
use super::{ChannelEnumerator, ChannelListing, EnumerationError};

/// Lists channel videos by running yt-dlp without downloading anything.
#[derive(Debug, Clone)]
pub struct YtDlpEnumerator {
    ytdlp: YtDlp,
}

impl YtDlpEnumerator {
    pub fn new(ytdlp: YtDlp) -> Self {
        Self { ytdlp }
    }
}

#[async_trait]
impl ChannelEnumerator for YtDlpEnumerator {
    async fn enumerate(
        &self,
        channel: &str,
        cookies: Option<&Path>,
    ) -> Result<ChannelListing, EnumerationError> {
        let url = channel_url::normalize(channel)?;
        tracing::info!(url = %url, authenticated = cookies.is_some(), "listing channel");

        let output = self
            .ytdlp
            .command(cookies)
            .arg("--flat-playlist")
            .arg("--dump-single-json")
            .arg("--ignore-errors")
            .arg(&url)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(EnumerationError::Spawn)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr_lines: Vec<String> = stderr.lines().map(str::to_string).collect();
        if self.ytdlp.is_verbose() {
            for line in &stderr_lines {
                tracing::info!(target: "yt-dlp", "{}", line);
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if stdout.is_empty() {
            let message = error_message(&stderr_lines);
            tracing::warn!(status = ?output.status, "channel listing failed: {}", message);
            return Err(classify_listing_error(channel, &message));
        }

        // --ignore-errors may exit non-zero while still printing a usable listing.
        if !output.status.success() {
            tracing::warn!(
                status = ?output.status,
                "yt-dlp reported errors during listing: {}",
                error_message(&stderr_lines)
            );
        }

        let listing = parse_listing(stdout)?;
        tracing::info!(
            channel = %listing.title,
            videos = listing.videos.len(),
            "channel listing complete"
        );
        Ok(listing)
    }
}
