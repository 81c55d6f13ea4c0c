//! The subset of yt-dlp's info JSON that ytcd reads.

use serde::{Deserialize, Deserializer};

/// Info dictionary printed by yt-dlp (`--dump-single-json`, `%()j`).
///
/// Used both for flat channel listings (where most fields are absent) and
/// for the full per-video dictionary printed after a download.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoJson {
    #[serde(rename = "_type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub upload_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub like_count: Option<u64>,
    pub channel: Option<String>,
    pub channel_id: Option<String>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub width: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub height: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fps: Option<f64>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub filesize_approx: Option<u64>,
    pub availability: Option<String>,
    /// Final path after post-processing (present in `after_move` output).
    pub filepath: Option<String>,
    /// Listing entries; `None` items are videos yt-dlp could not extract.
    pub entries: Option<Vec<Option<InfoJson>>>,
}

impl InfoJson {
    /// Best known size in bytes: exact when reported, else yt-dlp's estimate.
    pub fn size_hint(&self) -> Option<u64> {
        self.filesize.or(self.filesize_approx)
    }
}

/// Accept integers, floats, numeric strings or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64))
}
