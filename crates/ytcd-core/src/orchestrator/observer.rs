//! Run observation hooks. Observers cannot influence the run.

use crate::fetch::{FetchError, ProgressEvent};
use crate::ledger::LedgerEntry;
use crate::planner::DownloadJob;

use super::AbortCause;

/// 1-based position of a job within the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPosition {
    pub index: usize,
    pub total: usize,
}

/// Receives run events in order. Every method defaults to doing nothing.
pub trait RunObserver: Send {
    fn job_started(&mut self, _pos: JobPosition, _job: &DownloadJob) {}

    fn progress(&mut self, _event: &ProgressEvent) {}

    fn job_completed(&mut self, _job: &DownloadJob, _entry: &LedgerEntry) {}

    /// The executor reported the video as unreachable; the run continues.
    fn job_unavailable(&mut self, _job: &DownloadJob, _error: &FetchError) {}

    fn job_failed(&mut self, _job: &DownloadJob, _cause: &AbortCause) {}

    fn would_download(&mut self, _pos: JobPosition, _job: &DownloadJob) {}

    /// The run stopped on request with `remaining` jobs not started.
    fn interrupted(&mut self, _remaining: usize) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
