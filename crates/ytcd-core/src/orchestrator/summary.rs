//! Run outcome reporting.

use std::fmt;

use crate::fetch::FetchErrorKind;
use crate::listing::VideoId;

/// What stopped the run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    Fetch(FetchErrorKind),
    Ledger,
}

impl fmt::Display for AbortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortKind::Fetch(kind) => write!(f, "download failed ({kind})"),
            AbortKind::Ledger => f.write_str("ledger write failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AbortCause {
    pub video_id: VideoId,
    pub title: String,
    pub kind: AbortKind,
    pub message: String,
}

impl fmt::Display for AbortCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {} ({}): {}", self.kind, self.video_id, self.title, self.message)
    }
}

/// Counts and outcome of one run. Built once when the run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    total: usize,
    attempted: usize,
    succeeded: usize,
    skipped: usize,
    unavailable: usize,
    failed: usize,
    abort: Option<AbortCause>,
    interrupted: bool,
    dry_run: bool,
}

impl RunSummary {
    /// Distinct videos in the listing.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Jobs handed to the executor, or previewed in a dry run.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Already present before the run.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Excluded at planning or found unreachable while fetching.
    pub fn unavailable(&self) -> usize {
        self.unavailable
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn abort_cause(&self) -> Option<&AbortCause> {
        self.abort.as_ref()
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn is_success(&self) -> bool {
        self.abort.is_none() && self.failed == 0 && !self.interrupted
    }
}

/// Mutable counters while a run is in progress.
#[derive(Debug, Default)]
pub(super) struct Tally {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub unavailable: usize,
    /// Consecutive jobs the executor reported unreachable.
    pub unavailable_streak: usize,
    pub failed: usize,
    pub abort: Option<AbortCause>,
    pub interrupted: bool,
    pub dry_run: bool,
}

impl Tally {
    pub fn finish(self) -> RunSummary {
        RunSummary {
            total: self.total,
            attempted: self.attempted,
            succeeded: self.succeeded,
            skipped: self.skipped,
            unavailable: self.unavailable,
            failed: self.failed,
            abort: self.abort,
            interrupted: self.interrupted,
            dry_run: self.dry_run,
        }
    }
}
