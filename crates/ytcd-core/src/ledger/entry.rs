use serde::{Deserialize, Serialize};

use crate::fetch::FetchedMedia;
use crate::listing::{VideoId, VideoListing};

/// Column order of the ledger file. Matches the field order of `LedgerEntry`.
pub const COLUMNS: [&str; 18] = [
    "video_id",
    "title",
    "description",
    "upload_date",
    "duration",
    "view_count",
    "like_count",
    "channel",
    "channel_id",
    "uploader",
    "thumbnail",
    "width",
    "height",
    "fps",
    "video_codec",
    "audio_codec",
    "filesize",
    "download_timestamp",
];

/// One row of the ledger: a completed download and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub video_id: VideoId,
    pub title: String,
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
    pub download_timestamp: String,
}

impl LedgerEntry {
    /// Entry with only the required fields set.
    pub fn new(
        video_id: impl Into<VideoId>,
        title: impl Into<String>,
        download_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            description: None,
            upload_date: None,
            duration: None,
            view_count: None,
            like_count: None,
            channel: None,
            channel_id: None,
            uploader: None,
            thumbnail: None,
            width: None,
            height: None,
            fps: None,
            video_codec: None,
            audio_codec: None,
            filesize: None,
            download_timestamp: download_timestamp.into(),
        }
    }

    /// Combine the listing snapshot with what the executor reported.
    /// Executor values win; the listing fills gaps.
    pub fn from_fetch(
        listing: &VideoListing,
        fetched: &FetchedMedia,
        download_timestamp: String,
    ) -> Self {
        let d = &fetched.details;
        Self {
            video_id: listing.id.clone(),
            title: d
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| listing.title.clone()),
            description: d.description.clone(),
            upload_date: d.upload_date.clone().or_else(|| listing.upload_date.clone()),
            duration: d.duration.or(listing.duration),
            view_count: d.view_count.or(listing.view_count),
            like_count: d.like_count.or(listing.like_count),
            channel: d.channel.clone(),
            channel_id: d.channel_id.clone(),
            uploader: d.uploader.clone(),
            thumbnail: d.thumbnail.clone(),
            width: d.width,
            height: d.height,
            fps: d.fps,
            video_codec: d.video_codec.clone(),
            audio_codec: d.audio_codec.clone(),
            filesize: d.filesize,
            download_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MediaDetails;

    #[test]
    fn header_matches_field_order() {
        let mut w = ::csv::Writer::from_writer(vec![]);
        w.serialize(LedgerEntry::new("a", "t", "ts")).unwrap();
        let out = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn fetched_metadata_wins_over_listing() {
        let mut listing = VideoListing::new("abc", "Listing title");
        listing.view_count = Some(10);
        listing.duration = Some(60.0);
        let fetched = FetchedMedia {
            path: "/d/abc.mp4".into(),
            details: MediaDetails {
                title: Some("Real title".into()),
                view_count: Some(99),
                height: Some(1080),
                ..MediaDetails::default()
            },
        };
        let e = LedgerEntry::from_fetch(&listing, &fetched, "2026-01-01T00:00:00+00:00".into());
        assert_eq!(e.video_id.as_str(), "abc");
        assert_eq!(e.title, "Real title");
        assert_eq!(e.view_count, Some(99));
        assert_eq!(e.duration, Some(60.0));
        assert_eq!(e.height, Some(1080));
        assert_eq!(e.download_timestamp, "2026-01-01T00:00:00+00:00");
    }
}
