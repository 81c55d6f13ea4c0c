//! `ytcd download` – plan and run a channel download.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use ytcd_core::config::YtcdConfig;
use ytcd_core::control::RunControl;
use ytcd_core::enumerator::{ChannelEnumerator, YtDlpEnumerator};
use ytcd_core::fetch::YtDlpFetcher;
use ytcd_core::ledger::CsvLedger;
use ytcd_core::orchestrator::{self, RunOptions};
use ytcd_core::planner::{self, FsArtifactProbe, PlanOptions};
use ytcd_core::ytdlp::YtDlp;

use super::checked_cookies;
use crate::cli::report::{plan_line, summary_text, ConsoleObserver};
use crate::cli::signal::InterruptGuard;
use crate::cli::Outcome;

/// Resolved options for one download run (CLI flags over config).
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub channel_url: String,
    pub cookie_file: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub skip_existing: bool,
    pub verbose: bool,
}

pub async fn run_download(cfg: &YtcdConfig, args: DownloadArgs) -> Result<Outcome> {
    let cookies = checked_cookies(args.cookie_file.as_deref())?;
    let ytdlp = YtDlp::locate(cfg.yt_dlp_path.as_deref())?.verbose(args.verbose);

    println!("Fetching channel videos...");
    let listing = YtDlpEnumerator::new(ytdlp.clone())
        .enumerate(&args.channel_url, cookies.as_deref())
        .await?;
    if listing.videos.is_empty() {
        println!("No videos found in channel");
        return Ok(Outcome::Success);
    }
    println!("✓ Found {} videos in {}\n", listing.videos.len(), listing.title);

    let ledger_path = args.output_dir.join(&cfg.ledger_file);
    let mut ledger = if args.dry_run {
        CsvLedger::open_read_only(&ledger_path)?
    } else {
        std::fs::create_dir_all(&args.output_dir).with_context(|| {
            format!("failed to create output directory {}", args.output_dir.display())
        })?;
        CsvLedger::open(&ledger_path, cfg.ledger_retry_policy())?
    };

    let plan_options = PlanOptions {
        output_dir: args.output_dir.clone(),
        extension: cfg.merge_output_format.clone(),
        skip_existing: args.skip_existing,
        authenticated: cookies.is_some(),
    };
    let plan = planner::plan(&listing.videos, &ledger, &FsArtifactProbe, &plan_options);
    println!("{}", plan_line(&plan));

    let control = Arc::new(RunControl::new());
    let _interrupts = InterruptGuard::install(Arc::clone(&control));

    let fetcher = YtDlpFetcher::new(ytdlp, &args.output_dir)
        .cookies(cookies)
        .format(&cfg.format)
        .merge_output_format(&cfg.merge_output_format);
    let mut observer = ConsoleObserver::new(Duration::from_millis(cfg.progress_interval_ms));
    let run_options = RunOptions {
        dry_run: args.dry_run,
        control: Some(control),
    };

    let summary = orchestrator::run(plan, &fetcher, &mut ledger, &mut observer, &run_options).await;
    println!("\n{}", summary_text(&summary));

    Ok(if summary.interrupted() {
        Outcome::Interrupted
    } else if summary.is_success() {
        Outcome::Success
    } else {
        Outcome::Failed
    })
}
