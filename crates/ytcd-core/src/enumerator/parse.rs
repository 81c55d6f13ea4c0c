//! Parse yt-dlp flat-playlist JSON into a channel listing.

use crate::listing::{Availability, VideoListing};
use crate::ytdlp::InfoJson;

use super::{ChannelListing, EnumerationError};

/// Titles yt-dlp uses for placeholders in flat listings.
const PRIVATE_TITLE: &str = "[Private video]";
const DELETED_TITLE: &str = "[Deleted video]";
const UNAVAILABLE_TITLE: &str = "[Unavailable video]";

/// Parse the output of `yt-dlp --flat-playlist --dump-single-json`.
///
/// Nested playlists (channel tabs) are flattened in order. Entries yt-dlp
/// could not extract at all (`null`) carry no identifier and are dropped.
/// A document without `entries` is a single video.
pub fn parse_listing(json: &str) -> Result<ChannelListing, EnumerationError> {
    let root: InfoJson = serde_json::from_str(json)?;

    let Some(entries) = root.entries else {
        let title = root
            .channel
            .clone()
            .unwrap_or_else(|| "Unknown Channel".to_string());
        let videos = to_listing(&root).into_iter().collect();
        return Ok(ChannelListing { title, videos });
    };

    let title = root
        .title
        .clone()
        .unwrap_or_else(|| "Unknown Channel".to_string());
    let mut videos = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;
    flatten(entries, &mut videos, &mut dropped);
    if dropped > 0 {
        tracing::debug!(dropped, "skipped listing entries without an identifier");
    }
    Ok(ChannelListing { title, videos })
}

fn flatten(entries: Vec<Option<InfoJson>>, out: &mut Vec<VideoListing>, dropped: &mut usize) {
    for entry in entries {
        let Some(mut entry) = entry else {
            *dropped += 1;
            continue;
        };
        if let Some(children) = entry.entries.take() {
            flatten(children, out, dropped);
            continue;
        }
        if entry.kind.as_deref() == Some("playlist") {
            continue;
        }
        match to_listing(&entry) {
            Some(v) => out.push(v),
            None => *dropped += 1,
        }
    }
}

fn to_listing(info: &InfoJson) -> Option<VideoListing> {
    let id = info.id.as_deref().filter(|s| !s.is_empty())?;
    let title = info
        .title
        .clone()
        .unwrap_or_else(|| "Unknown Title".to_string());
    let availability = match title.as_str() {
        PRIVATE_TITLE => Availability::Private,
        DELETED_TITLE => Availability::Removed,
        UNAVAILABLE_TITLE => Availability::Unavailable,
        _ => Availability::from_ytdlp(info.availability.as_deref()),
    };
    Some(VideoListing {
        id: id.into(),
        title,
        upload_date: info.upload_date.clone(),
        duration: info.duration,
        view_count: info.view_count,
        like_count: info.like_count,
        availability,
    })
}

/// Map yt-dlp's error output during listing to an enumeration error.
pub fn classify_listing_error(channel: &str, message: &str) -> EnumerationError {
    let lower = message.to_ascii_lowercase();
    if message.contains("Sign in") || lower.contains("login") {
        return EnumerationError::AuthenticationRequired;
    }
    if lower.contains("does not exist")
        || lower.contains("http error 404")
        || lower.contains("this channel is not available")
    {
        return EnumerationError::ChannelNotFound(channel.to_string());
    }
    EnumerationError::Failed(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_channel_listing_in_order() {
        let json = r#"{
            "_type": "playlist", "title": "Some Channel - Videos",
            "entries": [
                {"_type": "url", "id": "v3", "title": "Newest", "duration": 120, "view_count": 5},
                {"_type": "url", "id": "v2", "title": "[Private video]"},
                {"_type": "url", "id": "v1", "title": "Oldest", "availability": "public"}
            ]
        }"#;
        let listing = parse_listing(json).unwrap();
        assert_eq!(listing.title, "Some Channel - Videos");
        let ids: Vec<_> = listing.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v3", "v2", "v1"]);
        assert_eq!(listing.videos[0].duration, Some(120.0));
        assert_eq!(listing.videos[0].view_count, Some(5));
        assert_eq!(listing.videos[1].availability, Availability::Private);
        assert_eq!(listing.videos[2].availability, Availability::Public);
    }

    #[test]
    fn null_entries_are_dropped_and_deleted_marked_removed() {
        let json = r#"{"title": "C", "entries": [
            null,
            {"id": "a", "title": "[Deleted video]"},
            {"id": "b", "title": "ok", "availability": "subscriber_only"}
        ]}"#;
        let listing = parse_listing(json).unwrap();
        assert_eq!(listing.videos.len(), 2);
        assert_eq!(listing.videos[0].availability, Availability::Removed);
        assert_eq!(listing.videos[1].availability, Availability::Restricted);
    }

    #[test]
    fn nested_tabs_are_flattened() {
        let json = r#"{"title": "C", "entries": [
            {"_type": "playlist", "title": "Videos", "entries": [{"id": "a", "title": "A"}]},
            {"_type": "playlist", "title": "Shorts", "entries": [{"id": "s", "title": "S"}]}
        ]}"#;
        let listing = parse_listing(json).unwrap();
        let ids: Vec<_> = listing.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["a", "s"]);
    }

    #[test]
    fn single_video_document() {
        let json = r#"{"id": "solo", "title": "One", "channel": "Chan"}"#;
        let listing = parse_listing(json).unwrap();
        assert_eq!(listing.title, "Chan");
        assert_eq!(listing.videos.len(), 1);
        assert_eq!(listing.videos[0].id.as_str(), "solo");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_listing("{not json"),
            Err(EnumerationError::Malformed(_))
        ));
    }

    #[test]
    fn classify_auth_and_not_found() {
        assert!(matches!(
            classify_listing_error("u", "Sign in to confirm your age"),
            EnumerationError::AuthenticationRequired
        ));
        assert!(matches!(
            classify_listing_error("u", "[youtube:tab] @nobody: This channel does not exist."),
            EnumerationError::ChannelNotFound(_)
        ));
        assert!(matches!(
            classify_listing_error("u", "HTTP Error 404: Not Found"),
            EnumerationError::ChannelNotFound(_)
        ));
        assert!(matches!(
            classify_listing_error("u", "Unable to download API page"),
            EnumerationError::Failed(_)
        ));
    }
}
