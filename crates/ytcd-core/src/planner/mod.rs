//! Job planner: reconcile a channel listing with the ledger and the output
//! directory into an ordered list of download jobs.
//!
//! Planning is pure with respect to the ledger; it only reads.

mod probe;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ledger::Ledger;
use crate::listing::{VideoId, VideoListing};

pub use probe::{ArtifactProbe, FsArtifactProbe};

/// One video to download. Consumed once by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadJob {
    pub id: VideoId,
    pub listing: VideoListing,
    pub destination: PathBuf,
}

/// Why a listing produced no job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ledger already records this id.
    Recorded,
    /// The destination already holds a complete artifact.
    ArtifactPresent,
}

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub output_dir: PathBuf,
    /// Artifact extension without the dot, e.g. `mp4`.
    pub extension: String,
    pub skip_existing: bool,
    /// Cookies are passed to the executor, so member and Premium videos
    /// are worth attempting.
    pub authenticated: bool,
}

impl PlanOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            extension: "mp4".to_string(),
            skip_existing: true,
            authenticated: false,
        }
    }
}

/// Ordered jobs plus what was left out and why.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub jobs: Vec<DownloadJob>,
    pub skipped: Vec<(VideoId, SkipReason)>,
    pub unavailable: Vec<VideoId>,
    /// Distinct videos in the listing.
    pub total: usize,
}

/// Destination path of a video's artifact.
pub fn destination_for(output_dir: &Path, id: &VideoId, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", id, extension))
}

/// Build the plan. Listing order is kept; a repeated id is planned once, at
/// its first occurrence.
pub fn plan(
    listings: &[VideoListing],
    ledger: &dyn Ledger,
    probe: &dyn ArtifactProbe,
    options: &PlanOptions,
) -> Plan {
    let mut seen: HashSet<&VideoId> = HashSet::with_capacity(listings.len());
    let mut out = Plan::default();

    for listing in listings {
        if !seen.insert(&listing.id) {
            tracing::debug!(id = %listing.id, "duplicate listing entry ignored");
            continue;
        }
        out.total += 1;

        if !listing.availability.is_downloadable(options.authenticated) {
            tracing::debug!(
                id = %listing.id,
                availability = %listing.availability,
                "not downloadable"
            );
            out.unavailable.push(listing.id.clone());
            continue;
        }

        let destination = destination_for(&options.output_dir, &listing.id, &options.extension);
        if options.skip_existing {
            let reason = if ledger.has(&listing.id) {
                Some(SkipReason::Recorded)
            } else if probe.is_complete(&destination) {
                Some(SkipReason::ArtifactPresent)
            } else {
                None
            };
            if let Some(reason) = reason {
                tracing::debug!(id = %listing.id, ?reason, "already present");
                out.skipped.push((listing.id.clone(), reason));
                continue;
            }
        }

        out.jobs.push(DownloadJob {
            id: listing.id.clone(),
            listing: listing.clone(),
            destination,
        });
    }

    tracing::info!(
        total = out.total,
        jobs = out.jobs.len(),
        skipped = out.skipped.len(),
        unavailable = out.unavailable.len(),
        "plan ready"
    );
    out
}
