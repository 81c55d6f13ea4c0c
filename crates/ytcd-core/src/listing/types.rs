//! Types shared by the enumerator, planner and ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable identifier of a video within a channel.
///
/// Used as the join key between the listing, the ledger and on-disk file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Availability of a video at enumeration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Public,
    Unlisted,
    /// Needs membership, Premium or a sign-in the listing cannot satisfy.
    Restricted,
    Private,
    Removed,
    Unavailable,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Public => "public",
            Availability::Unlisted => "unlisted",
            Availability::Restricted => "restricted",
            Availability::Private => "private",
            Availability::Removed => "removed",
            Availability::Unavailable => "unavailable",
        }
    }

    /// Map yt-dlp's `availability` field. Unknown or missing values are
    /// treated as public; the fetch step reports anything it cannot reach.
    pub fn from_ytdlp(s: Option<&str>) -> Self {
        match s {
            Some("unlisted") => Availability::Unlisted,
            Some("private") => Availability::Private,
            Some("needs_auth") | Some("subscriber_only") | Some("premium_only") => {
                Availability::Restricted
            }
            _ => Availability::Public,
        }
    }

    /// Whether the planner may turn this listing into a download job.
    /// Restricted videos are attempted when the session carries cookies.
    pub fn is_downloadable(self, authenticated: bool) -> bool {
        match self {
            Availability::Public | Availability::Unlisted => true,
            Availability::Restricted => authenticated,
            Availability::Private | Availability::Removed | Availability::Unavailable => false,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing-level snapshot of one video, as enumerated from the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoListing {
    pub id: VideoId,
    pub title: String,
    /// Upload date as `YYYYMMDD`, when the listing exposes it.
    pub upload_date: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub availability: Availability,
}

impl VideoListing {
    /// Minimal public listing with only an id and title.
    pub fn new(id: impl Into<VideoId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            upload_date: None,
            duration: None,
            view_count: None,
            like_count: None,
            availability: Availability::Public,
        }
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Canonical watch URL handed to yt-dlp for a single video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}
