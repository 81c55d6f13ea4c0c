//! Console output for `list` and `download`.

use std::fmt::Write as _;
use std::io::Write as _;
use std::time::{Duration, Instant};
use ytcd_core::enumerator::ChannelListing;
use ytcd_core::fetch::{FetchError, ProgressEvent};
use ytcd_core::ledger::LedgerEntry;
use ytcd_core::listing::format_duration;
use ytcd_core::orchestrator::{AbortCause, JobPosition, RunObserver, RunSummary};
use ytcd_core::planner::{DownloadJob, Plan};

const TITLE_WIDTH: usize = 60;

/// Table of a channel listing, limited to `max_rows` rows (0 = all).
pub fn render_listing(listing: &ChannelListing, max_rows: usize) -> String {
    let total = listing.videos.len();
    let shown = if max_rows == 0 { total } else { max_rows.min(total) };
    let mut out = String::new();

    let _ = writeln!(out, "Channel: {}", listing.title);
    let _ = writeln!(
        out,
        "{:>4}  {:<11}  {:<TITLE_WIDTH$}  {:>8}",
        "#", "Video ID", "Title", "Duration"
    );
    let _ = writeln!(out, "{}", "-".repeat(4 + 2 + 11 + 2 + TITLE_WIDTH + 2 + 8));
    for (i, video) in listing.videos.iter().take(shown).enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<11}  {:<TITLE_WIDTH$}  {:>8}",
            i + 1,
            video.id,
            truncate(&video.title, TITLE_WIDTH),
            format_duration(video.duration)
        );
    }
    if shown < total {
        let _ = writeln!(out, "Showing {shown} of {total} videos");
    }
    out
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut t: String = s.chars().take(width.saturating_sub(3)).collect();
    t.push_str("...");
    t
}

pub fn human_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if n < 1024 {
        return format!("{n} B");
    }
    let mut v = n as f64 / 1024.0;
    let mut unit = 0;
    while v >= 1024.0 && unit < UNITS.len() - 1 {
        v /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", v, UNITS[unit])
}

pub fn plan_line(plan: &Plan) -> String {
    format!(
        "{} to download, {} already present, {} unavailable",
        plan.jobs.len(),
        plan.skipped.len(),
        plan.unavailable.len()
    )
}

pub fn summary_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    let title = if summary.dry_run() {
        "Dry run summary"
    } else {
        "Download summary"
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "  Total videos:  {}", summary.total());
    if summary.dry_run() {
        let _ = writeln!(out, "  Would download: {}", summary.attempted());
    } else {
        let _ = writeln!(out, "  Successful:    {}", summary.succeeded());
        let _ = writeln!(out, "  Failed:        {}", summary.failed());
    }
    let _ = writeln!(out, "  Skipped:       {}", summary.skipped());
    let _ = writeln!(out, "  Unavailable:   {}", summary.unavailable());
    if let Some(cause) = summary.abort_cause() {
        let _ = writeln!(out, "Aborted at {} ({}): {}", cause.video_id, cause.kind, cause.message);
        let _ = writeln!(out, "Re-run the same command to resume.");
    } else if summary.interrupted() {
        let _ = writeln!(out, "Interrupted. Re-run the same command to resume.");
    }
    out
}

/// Prints job lifecycle lines and throttled progress to stdout.
pub struct ConsoleObserver {
    interval: Duration,
    last_progress: Option<Instant>,
    progress_shown: bool,
}

impl ConsoleObserver {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_progress: None,
            progress_shown: false,
        }
    }

    fn end_progress_line(&mut self) {
        if self.progress_shown {
            println!();
            self.progress_shown = false;
        }
    }
}

impl RunObserver for ConsoleObserver {
    fn job_started(&mut self, pos: JobPosition, job: &DownloadJob) {
        println!("[{}/{}] {}", pos.index, pos.total, job.listing.title);
        self.last_progress = None;
    }

    fn progress(&mut self, event: &ProgressEvent) {
        let now = Instant::now();
        let finished = event.total_bytes.is_some_and(|t| event.downloaded_bytes >= t);
        if let Some(last) = self.last_progress {
            if now.duration_since(last) < self.interval && !finished {
                return;
            }
        }
        self.last_progress = Some(now);

        let mut line = match (event.percent(), event.total_bytes) {
            (Some(pct), Some(total)) => format!("  {:5.1}% of {}", pct, human_bytes(total)),
            _ => format!("  {}", human_bytes(event.downloaded_bytes)),
        };
        if let Some(speed) = event.speed {
            let _ = write!(line, "  {}/s", human_bytes(speed as u64));
        }
        if let Some(eta) = event.eta {
            let _ = write!(line, "  ETA {}", format_duration(Some(eta as f64)));
        }
        print!("\r{line:<60}");
        let _ = std::io::stdout().flush();
        self.progress_shown = true;
    }

    fn job_completed(&mut self, job: &DownloadJob, entry: &LedgerEntry) {
        self.end_progress_line();
        match entry.filesize {
            Some(size) => println!("  ✓ {} ({})", job.id, human_bytes(size)),
            None => println!("  ✓ {}", job.id),
        }
    }

    fn job_unavailable(&mut self, job: &DownloadJob, error: &FetchError) {
        self.end_progress_line();
        println!("  - {} unavailable: {}", job.id, error.message);
    }

    fn job_failed(&mut self, _job: &DownloadJob, cause: &AbortCause) {
        self.end_progress_line();
        println!("  ✗ {}", cause);
    }

    fn would_download(&mut self, pos: JobPosition, job: &DownloadJob) {
        println!(
            "[{}/{}] Would download: {} ({})",
            pos.index,
            pos.total,
            job.listing.title,
            job.destination.display()
        );
    }

    fn interrupted(&mut self, remaining: usize) {
        self.end_progress_line();
        println!("Stopped: {remaining} video(s) not downloaded");
    }
}
