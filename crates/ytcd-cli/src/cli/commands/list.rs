//! `ytcd list` – show a channel's videos.

use anyhow::Result;
use std::path::Path;
use ytcd_core::config::YtcdConfig;
use ytcd_core::enumerator::{ChannelEnumerator, YtDlpEnumerator};
use ytcd_core::ytdlp::YtDlp;

use super::checked_cookies;
use crate::cli::report::render_listing;
use crate::cli::Outcome;

pub async fn run_list(
    cfg: &YtcdConfig,
    channel_url: &str,
    cookie_file: Option<&Path>,
    max_display: usize,
    verbose: bool,
) -> Result<Outcome> {
    let cookies = checked_cookies(cookie_file)?;
    let ytdlp = YtDlp::locate(cfg.yt_dlp_path.as_deref())?.verbose(verbose);
    let listing = YtDlpEnumerator::new(ytdlp)
        .enumerate(channel_url, cookies.as_deref())
        .await?;

    if listing.videos.is_empty() {
        println!("No videos found in channel");
        return Ok(Outcome::Success);
    }
    print!("{}", render_listing(&listing, max_display));
    println!("\nTotal videos: {}", listing.videos.len());
    Ok(Outcome::Success)
}
