//! Channel URL normalization.
//!
//! A bare channel URL lists the channel's tabs (Videos, Shorts, Live) rather
//! than its videos, so `/videos` is appended to those. Tabs, playlists and
//! single-video URLs are passed through.

use url::Url;

use super::EnumerationError;

/// Path prefixes that identify a channel root on YouTube.
const CHANNEL_PREFIXES: &[&str] = &["channel", "c", "user"];

/// Normalize a user-supplied channel reference.
pub fn normalize(input: &str) -> Result<String, EnumerationError> {
    let trimmed = input.trim();
    let mut url = Url::parse(trimmed)
        .map_err(|e| EnumerationError::InvalidUrl(trimmed.to_string(), e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(EnumerationError::InvalidUrl(
            trimmed.to_string(),
            "only http(s) URLs are supported".to_string(),
        ));
    }
    if url.host_str().is_none() {
        return Err(EnumerationError::InvalidUrl(
            trimmed.to_string(),
            "missing host".to_string(),
        ));
    }

    let segments: Vec<String> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();

    if is_channel_root(&segments) {
        let mut path = segments.join("/");
        path.push_str("/videos");
        url.set_path(&path);
        tracing::debug!(url = %url, "appended /videos to bare channel URL");
    }

    Ok(url.to_string())
}

fn is_channel_root(segments: &[String]) -> bool {
    match segments {
        [handle] => handle.starts_with('@'),
        [prefix, _] => CHANNEL_PREFIXES.contains(&prefix.as_str()),
        _ => false,
    }
}
