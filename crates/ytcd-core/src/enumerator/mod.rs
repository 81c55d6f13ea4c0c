//! Channel enumeration: turn a channel reference into an ordered video listing.
//!
//! The core only consumes the listing; `YtDlpEnumerator` produces it by
//! running yt-dlp in flat-playlist mode.

pub mod channel_url;
mod parse;
mod ytdlp;

use async_trait::async_trait;
use std::path::Path;

use crate::listing::VideoListing;

pub use parse::{classify_listing_error, parse_listing};
pub use ytdlp::YtDlpEnumerator;

/// Ordered videos of one channel plus its display title.
#[derive(Debug, Clone, Default)]
pub struct ChannelListing {
    pub title: String,
    pub videos: Vec<VideoListing>,
}

/// Fatal conditions while listing a channel. Never retried by the core.
#[derive(Debug, thiserror::Error)]
pub enum EnumerationError {
    #[error("invalid channel URL '{0}': {1}")]
    InvalidUrl(String, String),
    #[error("channel not found: {0}")]
    ChannelNotFound(String),
    #[error("authentication required; provide a valid cookie file")]
    AuthenticationRequired,
    #[error("failed to run yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("could not parse channel listing: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to list channel videos: {0}")]
    Failed(String),
}

/// Produces the ordered listing for a channel reference.
#[async_trait]
pub trait ChannelEnumerator: Send + Sync {
    async fn enumerate(
        &self,
        channel: &str,
        cookies: Option<&Path>,
    ) -> Result<ChannelListing, EnumerationError>;
}
