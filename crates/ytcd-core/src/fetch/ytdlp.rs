//! Fetch executor backed by yt-dlp.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

use crate::planner::DownloadJob;
use crate::ytdlp::{error_message, InfoJson, YtDlp};

use super::progress::{parse_line, OutputLine, PROGRESS_TEMPLATE};
use super::{FetchError, FetchErrorKind, FetchExecutor, FetchedMedia, MediaDetails, ProgressEvent};

/// Downloads one video per call with yt-dlp, merging the best video and
/// audio streams into `{output_dir}/{id}.{ext}`.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    ytdlp: YtDlp,
    cookies: Option<PathBuf>,
    format: String,
    merge_output_format: String,
    output_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(ytdlp: YtDlp, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            ytdlp,
            cookies: None,
            format: "bestvideo[ext=mp4]+bestaudio[ext=m4a]/bestvideo+bestaudio/best".to_string(),
            merge_output_format: "mp4".to_string(),
            output_dir: output_dir.into(),
        }
    }

    pub fn cookies(mut self, cookies: Option<PathBuf>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn merge_output_format(mut self, ext: impl Into<String>) -> Self {
        self.merge_output_format = ext.into();
        self
    }

    fn output_template(&self) -> String {
        self.output_dir
            .join("%(id)s.%(ext)s")
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait]
impl FetchExecutor for YtDlpFetcher {
    async fn fetch(
        &self,
        job: &DownloadJob,
        progress: UnboundedSender<ProgressEvent>,
    ) -> Result<FetchedMedia, FetchError> {
        let url = job.listing.watch_url();
        tracing::debug!(id = %job.id, url = %url, "starting yt-dlp download");

        let mut child = self
            .ytdlp
            .command(self.cookies.as_deref())
            .arg("--no-playlist")
            .arg("--newline")
            .arg("--progress")
            .arg("--progress-template")
            .arg(PROGRESS_TEMPLATE)
            .arg("-f")
            .arg(&self.format)
            .arg("--merge-output-format")
            .arg(&self.merge_output_format)
            .arg("-o")
            .arg(self.output_template())
            .arg("--print")
            .arg("after_move:%()j")
            .arg("--no-simulate")
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                FetchError::new(FetchErrorKind::Unknown, format!("failed to run yt-dlp: {e}"))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FetchError::new(FetchErrorKind::Unknown, "yt-dlp stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| FetchError::new(FetchErrorKind::Unknown, "yt-dlp stderr not captured"))?;
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();

        let mut info: Option<InfoJson> = None;
        let mut errors: Vec<String> = Vec::new();
        let mut stderr_tail: Vec<String> = Vec::new();
        let (mut out_open, mut err_open) = (true, true);

        while out_open || err_open {
            let line = tokio::select! {
                l = out_lines.next_line(), if out_open => match l {
                    Ok(Some(l)) => l,
                    _ => { out_open = false; continue; }
                },
                l = err_lines.next_line(), if err_open => match l {
                    Ok(Some(l)) => l,
                    _ => { err_open = false; continue; }
                },
            };
            match parse_line(&line) {
                OutputLine::Progress {
                    downloaded_bytes,
                    total_bytes,
                    speed,
                    eta,
                } => {
                    // Receiver gone means nobody is observing; keep downloading.
                    let _ = progress.send(ProgressEvent {
                        id: job.id.clone(),
                        downloaded_bytes,
                        total_bytes,
                        speed,
                        eta,
                    });
                }
                OutputLine::Info(parsed) => info = Some(*parsed),
                OutputLine::Error(msg) => {
                    tracing::debug!(id = %job.id, "yt-dlp error: {}", msg);
                    errors.push(msg);
                }
                OutputLine::Other(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    if self.ytdlp.is_verbose() {
                        tracing::info!(target: "yt-dlp", "{}", text);
                    } else {
                        tracing::trace!(id = %job.id, "{}", text);
                    }
                    stderr_tail.push(text);
                    if stderr_tail.len() > 20 {
                        stderr_tail.remove(0);
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| {
                FetchError::new(FetchErrorKind::Unknown, format!("waiting for yt-dlp: {e}"))
            })?;

        if !status.success() {
            let message = match errors.last() {
                Some(m) => m.clone(),
                None => error_message(&stderr_tail),
            };
            let message = if message.is_empty() {
                format!("yt-dlp exited with {status}")
            } else {
                message
            };
            return Err(FetchError::from_message(message));
        }

        let info = info.unwrap_or_default();
        let path = info
            .filepath
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| job.destination.clone());
        let on_disk = file_len(&path).await;
        if on_disk.unwrap_or(0) == 0 {
            return Err(FetchError::new(
                FetchErrorKind::Unknown,
                format!("yt-dlp reported success but {} is missing or empty", path.display()),
            ));
        }
        let details = details_from_info(&info, on_disk);
        tracing::debug!(
            id = %job.id,
            path = %path.display(),
            size = ?details.filesize,
            "download finished"
        );
        Ok(FetchedMedia { path, details })
    }
}

async fn file_len(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().filter(|m| m.is_file()).map(|m| m.len())
}

/// Convert yt-dlp's info JSON to media details. The on-disk size wins over
/// the size yt-dlp estimated for the selected formats.
fn details_from_info(info: &InfoJson, on_disk: Option<u64>) -> MediaDetails {
    MediaDetails {
        title: info.title.clone(),
        description: info.description.clone(),
        upload_date: info.upload_date.clone(),
        duration: info.duration,
        view_count: info.view_count,
        like_count: info.like_count,
        channel: info.channel.clone(),
        channel_id: info.channel_id.clone(),
        uploader: info.uploader.clone(),
        thumbnail: info.thumbnail.clone(),
        width: info.width,
        height: info.height,
        fps: info.fps,
        video_codec: info.vcodec.clone(),
        audio_codec: info.acodec.clone(),
        filesize: on_disk.or_else(|| info.size_hint()),
    }
}


#[cfg(all(test, unix))]
mod process_tests {
    use super::*;
    use crate::listing::VideoListing;
    use std::os::unix::fs::PermissionsExt;
    use tokio::sync::mpsc;

    fn stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("yt-dlp-stub");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn job(dir: &Path, id: &str) -> DownloadJob {
        DownloadJob {
            id: id.into(),
            listing: VideoListing::new(id, "Title"),
            destination: dir.join(format!("{id}.mp4")),
        }
    }

    #[tokio::test]
    async fn stub_download_reports_progress_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let target = out.join("vid1.mp4");
        let script = format!(
            "echo 'ytcd-progress 5 10 NA 100.0 1'\n\
             echo 'ytcd-progress 10 10 NA 100.0 0'\n\
             printf 'data' > '{}'\n\
             echo '{{\"id\": \"vid1\", \"title\": \"Real\", \"channel\": \"Chan\", \"filepath\": \"{}\"}}'",
            target.display(),
            target.display()
        );
        let fetcher = YtDlpFetcher::new(YtDlp::new(stub(dir.path(), &script)), &out);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let media = fetcher.fetch(&job(&out, "vid1"), tx).await.unwrap();
        assert_eq!(media.path, target);
        assert_eq!(media.details.title.as_deref(), Some("Real"));
        assert_eq!(media.details.channel.as_deref(), Some("Chan"));
        assert_eq!(media.details.filesize, Some(4));

        let mut seen = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            seen.push(ev.downloaded_bytes);
        }
        assert_eq!(seen, [5, 10]);
    }

    #[tokio::test]
    async fn stub_failure_is_classified() {
        let dir = tempfile::tempdir().unwrap();
        let script = "echo 'ERROR: [youtube] vid2: Private video. Sign in if you have access' >&2\nexit 1";
        let fetcher = YtDlpFetcher::new(YtDlp::new(stub(dir.path(), script)), dir.path());
        let (tx, _rx) = mpsc::unbounded_channel();
        let err = fetcher.fetch(&job(dir.path(), "vid2"), tx).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Unavailable);
        assert!(err.message.contains("Private video"));
    }
}
