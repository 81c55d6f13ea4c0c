//! Shared fakes for orchestrator integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;

use ytcd_core::control::RunControl;
use ytcd_core::fetch::{
    FetchError, FetchErrorKind, FetchExecutor, FetchedMedia, MediaDetails, ProgressEvent,
};
use ytcd_core::ledger::{Ledger, LedgerEntry, LedgerError};
use ytcd_core::listing::{VideoId, VideoListing};
use ytcd_core::orchestrator::{AbortCause, JobPosition, RunObserver};
use ytcd_core::planner::DownloadJob;

pub fn listings(ids: &[&str]) -> Vec<VideoListing> {
    ids.iter()
        .map(|id| VideoListing::new(*id, format!("Video {id}")))
        .collect()
}

pub fn ids(jobs: &[DownloadJob]) -> Vec<String> {
    jobs.iter().map(|j| j.id.to_string()).collect()
}

/// Executor that writes a small artifact per job and sends two progress
/// events, unless a failure is scripted for the id.
#[derive(Default)]
pub struct ScriptedFetch {
    failures: HashMap<String, FetchErrorKind>,
    interrupt_on: Option<(String, Arc<RunControl>)>,
    attempts: Mutex<Vec<String>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, id: &str, kind: FetchErrorKind) -> Self {
        self.failures.insert(id.to_string(), kind);
        self
    }

    /// Request an interrupt while `id` is being fetched, the way Ctrl-C
    /// reaches both ytcd and the child process.
    pub fn interrupting_on(mut self, id: &str, control: Arc<RunControl>) -> Self {
        self.interrupt_on = Some((id.to_string(), control));
        self
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl FetchExecutor for ScriptedFetch {
    async fn fetch(
        &self,
        job: &DownloadJob,
        progress: UnboundedSender<ProgressEvent>,
    ) -> Result<FetchedMedia, FetchError> {
        self.attempts.lock().unwrap().push(job.id.to_string());
        for done in [4u64, 8] {
            let _ = progress.send(ProgressEvent {
                id: job.id.clone(),
                downloaded_bytes: done,
                total_bytes: Some(8),
                speed: Some(1024.0),
                eta: Some(0),
            });
            tokio::task::yield_now().await;
        }
        if let Some((id, control)) = &self.interrupt_on {
            if id == job.id.as_str() {
                control.request_interrupt();
            }
        }
        if let Some(kind) = self.failures.get(job.id.as_str()) {
            return Err(FetchError::new(*kind, format!("scripted failure for {}", job.id)));
        }
        std::fs::write(&job.destination, b"fakemp4!")
            .map_err(|e| FetchError::new(FetchErrorKind::Unknown, e.to_string()))?;
        Ok(FetchedMedia {
            path: job.destination.clone(),
            details: MediaDetails {
                height: Some(1080),
                video_codec: Some("avc1".into()),
                filesize: Some(8),
                ..MediaDetails::default()
            },
        })
    }
}

/// Records every observer callback as a line of text and can request an
/// interrupt after a number of completed jobs.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Vec<String>,
    pub completed: Vec<String>,
    interrupt_after: Option<(usize, Arc<RunControl>)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt_after(completions: usize, control: Arc<RunControl>) -> Self {
        Self {
            interrupt_after: Some((completions, control)),
            ..Self::default()
        }
    }
}

impl RunObserver for RecordingObserver {
    fn job_started(&mut self, pos: JobPosition, job: &DownloadJob) {
        self.events
            .push(format!("start {} {}/{}", job.id, pos.index, pos.total));
    }

    fn progress(&mut self, event: &ProgressEvent) {
        self.events
            .push(format!("progress {} {}", event.id, event.downloaded_bytes));
    }

    fn job_completed(&mut self, job: &DownloadJob, _entry: &LedgerEntry) {
        self.events.push(format!("done {}", job.id));
        self.completed.push(job.id.to_string());
        if let Some((n, control)) = &self.interrupt_after {
            if self.completed.len() >= *n {
                control.request_interrupt();
            }
        }
    }

    fn job_unavailable(&mut self, job: &DownloadJob, _error: &FetchError) {
        self.events.push(format!("unavailable {}", job.id));
    }

    fn job_failed(&mut self, job: &DownloadJob, _cause: &AbortCause) {
        self.events.push(format!("failed {}", job.id));
    }

    fn would_download(&mut self, pos: JobPosition, job: &DownloadJob) {
        self.events
            .push(format!("would {} {}/{}", job.id, pos.index, pos.total));
    }

    fn interrupted(&mut self, remaining: usize) {
        self.events.push(format!("interrupted {remaining}"));
    }
}

/// Ledger whose appends always fail.
#[derive(Default)]
pub struct FailingLedger {
    pub attempts: usize,
}

#[async_trait]
impl Ledger for FailingLedger {
    fn has(&self, _id: &VideoId) -> bool {
        false
    }

    fn load_all(&self) -> HashSet<VideoId> {
        HashSet::new()
    }

    async fn append(&mut self, _entry: &LedgerEntry) -> Result<(), LedgerError> {
        self.attempts += 1;
        Err(LedgerError::Write {
            path: PathBuf::from("ledger.csv"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

/// Every file under `dir` with its contents.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut out = BTreeMap::new();
    let mut stack = vec![dir.to_path_buf()];
    while let Some(d) = stack.pop() {
        for entry in std::fs::read_dir(&d).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                stack.push(path);
            } else {
                out.insert(path.clone(), std::fs::read(&path).unwrap());
            }
        }
    }
    out
}

/// Video ids of the ledger's data rows, in file order.
pub fn ledger_rows(path: &Path) -> Vec<String> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records()
        .map(|r| r.unwrap().get(0).unwrap().to_string())
        .collect()
}
