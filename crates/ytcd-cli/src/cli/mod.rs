//! CLI for the ytcd channel downloader.

mod commands;
mod report;
mod signal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ytcd_core::config;

use commands::{run_download, run_list, DownloadArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "ytcd")]
#[command(
    about = "ytcd: download every video of a YouTube channel in the best available quality",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List a channel's videos without downloading.
    List {
        /// Channel URL, e.g. https://www.youtube.com/@channelname
        channel_url: String,

        /// Netscape-format cookie file for authenticated access.
        #[arg(short = 'c', long, value_name = "FILE")]
        cookie_file: Option<PathBuf>,

        /// Rows to show in the table (0 for all).
        #[arg(short = 'n', long, default_value_t = 20, value_name = "N")]
        max_display: usize,

        /// Show yt-dlp's own output and debug logs.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Download every available video of a channel.
    Download {
        /// Channel URL, e.g. https://www.youtube.com/@channelname/videos
        channel_url: String,

        /// Netscape-format cookie file for authenticated access.
        #[arg(short = 'c', long, value_name = "FILE")]
        cookie_file: Option<PathBuf>,

        /// Directory for videos and the metadata ledger (default from config).
        #[arg(short = 'o', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Show what would be downloaded without downloading or writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Skip videos already in the ledger or on disk (default).
        #[arg(long, overrides_with = "no_skip_existing")]
        skip_existing: bool,

        /// Download every available video even if already present.
        #[arg(long, overrides_with = "skip_existing")]
        no_skip_existing: bool,

        /// Show yt-dlp's own output and debug logs.
        #[arg(short, long)]
        verbose: bool,
    },
}

impl CliCommand {
    pub fn verbose(&self) -> bool {
        match self {
            CliCommand::List { verbose, .. } | CliCommand::Download { verbose, .. } => *verbose,
        }
    }
}

/// How a command ended, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
    Interrupted,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed => 1,
            Outcome::Interrupted => 130,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<Outcome> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::List {
                channel_url,
                cookie_file,
                max_display,
                verbose,
            } => run_list(&cfg, &channel_url, cookie_file.as_deref(), max_display, verbose).await,
            CliCommand::Download {
                channel_url,
                cookie_file,
                output_dir,
                dry_run,
                skip_existing: _,
                no_skip_existing,
                verbose,
            } => {
                let args = DownloadArgs {
                    channel_url,
                    cookie_file,
                    output_dir: output_dir.unwrap_or_else(|| cfg.output_dir.clone()),
                    dry_run,
                    skip_existing: !no_skip_existing,
                    verbose,
                };
                run_download(&cfg, args).await
            }
        }
    }
}

#[cfg(test)]
mod tests;
