//! Run orchestrator: execute a plan one job at a time.
//!
//! Jobs run strictly in plan order. The first fetch failure or an
//! unrecoverable ledger write stops the run; every job completed before
//! that point keeps its artifact and its ledger row, so re-running the same
//! command resumes after it.
//!
//! A single video the executor reports unreachable is counted and skipped.
//! A second one in a row stops the run like any other fetch failure.

mod observer;
mod state;
mod summary;

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::control::RunControl;
use crate::fetch::{FetchError, FetchErrorKind, FetchExecutor, FetchedMedia};
use crate::ledger::{Ledger, LedgerEntry};
use crate::planner::{DownloadJob, Plan};

pub use observer::{JobPosition, NoopObserver, RunObserver};
pub use state::{InvalidTransition, JobState};
pub use summary::{AbortCause, AbortKind, RunSummary};

use summary::Tally;

/// Consecutive executor-reported unavailable jobs that abort the run.
const MAX_UNAVAILABLE_STREAK: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report what would be downloaded without fetching or writing.
    pub dry_run: bool,
    /// Checked before each job; when set, no further job starts.
    pub control: Option<Arc<RunControl>>,
}

impl RunOptions {
    fn interrupt_requested(&self) -> bool {
        self.control.as_ref().is_some_and(|c| c.is_interrupted())
    }
}

enum Step {
    Continue,
    Stop,
}

/// Execute `plan` and report the outcome.
pub async fn run(
    plan: Plan,
    fetch: &dyn FetchExecutor,
    ledger: &mut dyn Ledger,
    observer: &mut dyn RunObserver,
    options: &RunOptions,
) -> RunSummary {
    let mut tally = Tally {
        total: plan.total,
        skipped: plan.skipped.len(),
        unavailable: plan.unavailable.len(),
        dry_run: options.dry_run,
        ..Tally::default()
    };
    let count = plan.jobs.len();
    tracing::info!(jobs = count, dry_run = options.dry_run, "run starting");

    for (i, job) in plan.jobs.iter().enumerate() {
        let pos = JobPosition {
            index: i + 1,
            total: count,
        };
        if options.interrupt_requested() {
            tracing::warn!(
                remaining = count - i,
                "interrupt requested; stopping before next job"
            );
            tally.interrupted = true;
            observer.interrupted(count - i);
            break;
        }
        if options.dry_run {
            tally.attempted += 1;
            observer.would_download(pos, job);
            continue;
        }
        let step = run_job(pos, job, fetch, ledger, observer, options, &mut tally).await;
        if let Step::Stop = step {
            break;
        }
    }

    let summary = tally.finish();
    tracing::info!(
        attempted = summary.attempted(),
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        skipped = summary.skipped(),
        unavailable = summary.unavailable(),
        interrupted = summary.interrupted(),
        "run finished"
    );
    summary
}

async fn run_job(
    pos: JobPosition,
    job: &DownloadJob,
    fetch: &dyn FetchExecutor,
    ledger: &mut dyn Ledger,
    observer: &mut dyn RunObserver,
    options: &RunOptions,
    tally: &mut Tally,
) -> Step {
    let mut state = JobState::Pending;
    advance(&mut state, JobState::Running, job);
    tally.attempted += 1;
    tracing::info!(
        id = %job.id,
        index = pos.index,
        total = pos.total,
        "downloading {}",
        job.listing.title
    );
    observer.job_started(pos, job);

    let media = match fetch_with_progress(fetch, job, observer).await {
        Ok(media) => media,
        Err(e) if options.interrupt_requested() => {
            // Ctrl-C reaches the child process too; its failure is the interrupt.
            advance(&mut state, JobState::Failed, job);
            tracing::warn!(id = %job.id, "download stopped by interrupt: {}", e);
            tally.interrupted = true;
            observer.interrupted(pos.total - pos.index + 1);
            return Step::Stop;
        }
        Err(e)
            if e.kind == FetchErrorKind::Unavailable
                && tally.unavailable_streak + 1 < MAX_UNAVAILABLE_STREAK =>
        {
            advance(&mut state, JobState::Unavailable, job);
            tracing::warn!(id = %job.id, "video unavailable: {}", e.message);
            tally.unavailable += 1;
            tally.unavailable_streak += 1;
            observer.job_unavailable(job, &e);
            return Step::Continue;
        }
        Err(e) => {
            let cause = AbortCause {
                video_id: job.id.clone(),
                title: job.listing.title.clone(),
                kind: AbortKind::Fetch(e.kind),
                message: e.message,
            };
            return abort(&mut state, job, cause, observer, tally);
        }
    };

    let entry = LedgerEntry::from_fetch(&job.listing, &media, chrono::Local::now().to_rfc3339());
    if let Err(e) = ledger.append(&entry).await {
        let cause = AbortCause {
            video_id: job.id.clone(),
            title: entry.title.clone(),
            kind: AbortKind::Ledger,
            message: e.to_string(),
        };
        return abort(&mut state, job, cause, observer, tally);
    }

    advance(&mut state, JobState::Completed, job);
    tally.succeeded += 1;
    tally.unavailable_streak = 0;
    tracing::info!(id = %job.id, path = %media.path.display(), "download complete");
    observer.job_completed(job, &entry);
    Step::Continue
}

fn abort(
    state: &mut JobState,
    job: &DownloadJob,
    cause: AbortCause,
    observer: &mut dyn RunObserver,
    tally: &mut Tally,
) -> Step {
    advance(state, JobState::Failed, job);
    tracing::error!(id = %job.id, "aborting run: {}", cause);
    tally.failed += 1;
    observer.job_failed(job, &cause);
    tally.abort = Some(cause);
    Step::Stop
}

fn advance(state: &mut JobState, next: JobState, job: &DownloadJob) {
    match state.transition(next) {
        Ok(s) => {
            *state = s;
            tracing::debug!(id = %job.id, state = %s, "job state");
        }
        Err(e) => tracing::error!(id = %job.id, "{}", e),
    }
}

/// Await one fetch, handing each progress event to the observer as soon as
/// it arrives and in the order sent.
async fn fetch_with_progress(
    fetch: &dyn FetchExecutor,
    job: &DownloadJob,
    observer: &mut dyn RunObserver,
) -> Result<FetchedMedia, FetchError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let fut = fetch.fetch(job, tx);
    tokio::pin!(fut);

    let result = loop {
        tokio::select! {
            biased;
            Some(event) = rx.recv() => observer.progress(&event),
            res = &mut fut => break res,
        }
    };
    while let Ok(event) = rx.try_recv() {
        observer.progress(&event);
    }
    result
}
