//! Fetch executor: download one job's media to its destination.
//!
//! The orchestrator drives a `FetchExecutor` one job at a time and forwards
//! every `ProgressEvent` it sends to the run observer as it arrives.

mod classify;
mod error;
mod progress;
mod ytdlp;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

use crate::listing::VideoId;
use crate::planner::DownloadJob;

pub use classify::classify_message;
pub use error::{FetchError, FetchErrorKind};
pub use progress::{parse_line, OutputLine, PROGRESS_TEMPLATE};
pub use ytdlp::YtDlpFetcher;

/// A progress sample for the job currently running.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub id: VideoId,
    pub downloaded_bytes: u64,
    pub total_bytes: Option<u64>,
    /// Bytes per second.
    pub speed: Option<f64>,
    /// Seconds remaining.
    pub eta: Option<u64>,
}

impl ProgressEvent {
    /// Percentage complete, when the total is known.
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some(self.downloaded_bytes as f64 * 100.0 / total as f64),
            _ => None,
        }
    }
}

/// Metadata reported by the executor for a finished download.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub channel: Option<String>,
    pub channel_id: Option<String>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub fps: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub filesize: Option<u64>,
}

/// A completed artifact and what the executor learned about it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMedia {
    pub path: PathBuf,
    pub details: MediaDetails,
}

/// Downloads a single job. Implementations must leave either a complete
/// artifact at the returned path or return an error.
#[async_trait]
pub trait FetchExecutor: Send + Sync {
    async fn fetch(
        &self,
        job: &DownloadJob,
        progress: UnboundedSender<ProgressEvent>,
    ) -> Result<FetchedMedia, FetchError>;
}
