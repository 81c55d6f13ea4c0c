//! CSV-backed ledger.
//!
//! Layout: a header row (`COLUMNS`) followed by one row per completed
//! download. Rows are only ever appended. Each append writes the fully
//! encoded row with a single `write_all` at the last committed offset and
//! then `sync_data`; a failed attempt truncates back to that offset, so the
//! file never keeps a partial row from a failure this process observed.
//! A partial row left by a crash is cut off the next time the ledger is
//! opened for writing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use ::csv::{ByteRecord, Terminator, WriterBuilder};

use super::entry::{LedgerEntry, COLUMNS};
use super::error::LedgerError;
use super::scan::{scan, Scan};
use super::Ledger;
use crate::listing::VideoId;
use crate::retry::{run_with_retry, RetryPolicy};

/// Ledger stored as a CSV file, with all effective entries held in memory.
#[derive(Debug)]
pub struct CsvLedger {
    path: PathBuf,
    appender: Option<Appender>,
    entries: HashMap<VideoId, LedgerEntry>,
    retry: RetryPolicy,
}

impl CsvLedger {
    /// Open or create the ledger for appending, repairing a torn tail.
    pub fn open(path: impl Into<PathBuf>, retry: RetryPolicy) -> Result<Self, LedgerError> {
        let path = path.into();
        let io_err = |source| LedgerError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let mut file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(io_err)?;

        let scan = scan_file(&path, &bytes)?;
        let total = bytes.len() as u64;
        let mut committed_len = scan.valid_len;
        if scan.is_torn(total) {
            tracing::warn!(
                path = %path.display(),
                dropped_bytes = total - scan.valid_len,
                "truncating incomplete trailing ledger row"
            );
            file.set_len(scan.valid_len).map_err(io_err)?;
            file.sync_data().map_err(io_err)?;
        }
        if scan.header.is_none() {
            let header = encode_header()?;
            file.seek(SeekFrom::Start(0)).map_err(io_err)?;
            file.write_all(&header).map_err(io_err)?;
            file.sync_data().map_err(io_err)?;
            committed_len = header.len() as u64;
            tracing::debug!(path = %path.display(), "created ledger");
        }

        let entries = load_entries(&path, &scan)?;
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened ledger");
        Ok(Self {
            path,
            appender: Some(Appender::new(file, committed_len)),
            entries,
            retry,
        })
    }

    /// Load the ledger without creating, repairing or writing anything.
    /// A missing file is an empty ledger; a torn tail is ignored.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => load_entries(&path, &scan_file(&path, &bytes)?)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => return Err(LedgerError::Io { path, source }),
        };
        Ok(Self {
            path,
            appender: None,
            entries,
            retry: RetryPolicy::no_retry(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, id: &VideoId) -> Option<&LedgerEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    fn inject_write_failures(&mut self, n: u32) {
        if let Some(a) = self.appender.as_mut() {
            a.injected_failures = n;
        }
    }
}

#[async_trait]
impl Ledger for CsvLedger {
    fn has(&self, id: &VideoId) -> bool {
        self.entries.contains_key(id)
    }

    fn load_all(&self) -> HashSet<VideoId> {
        self.entries.keys().cloned().collect()
    }

    async fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let appender = self
            .appender
            .as_mut()
            .ok_or_else(|| LedgerError::ReadOnly(self.path.clone()))?;
        let row = encode_row(entry)?;
        let path = &self.path;

        run_with_retry(&self.retry, LedgerError::retry_kind, |attempt| {
            appender.write_row(&row).map_err(|source| {
                tracing::debug!(attempt, id = %entry.video_id, "ledger write failed: {}", source);
                LedgerError::Write {
                    path: path.clone(),
                    source,
                }
            })
        })
        .await?;

        tracing::debug!(id = %entry.video_id, "ledger row appended");
        self.entries.insert(entry.video_id.clone(), entry.clone());
        Ok(())
    }
}

/// Owns the writable file handle and the length of its committed prefix.
#[derive(Debug)]
struct Appender {
    file: File,
    committed_len: u64,
    #[cfg(test)]
    injected_failures: u32,
}

impl Appender {
    fn new(file: File, committed_len: u64) -> Self {
        Self {
            file,
            committed_len,
            #[cfg(test)]
            injected_failures: 0,
        }
    }

    fn write_row(&mut self, row: &[u8]) -> io::Result<()> {
        let start = self.committed_len;
        match self.try_write(start, row) {
            Ok(()) => {
                self.committed_len = start + row.len() as u64;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.file.set_len(start) {
                    tracing::warn!("could not roll back partial ledger row: {}", rollback);
                }
                Err(e)
            }
        }
    }

    fn try_write(&mut self, start: u64, row: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(start))?;
        if self.take_injected_failure() {
            self.file.write_all(&row[..row.len() / 2])?;
            return Err(io::Error::new(io::ErrorKind::Other, "injected write failure"));
        }
        self.file.write_all(row)?;
        self.file.sync_data()
    }

    #[cfg(test)]
    fn take_injected_failure(&mut self) -> bool {
        if self.injected_failures == 0 {
            return false;
        }
        self.injected_failures -= 1;
        true
    }

    #[cfg(not(test))]
    fn take_injected_failure(&mut self) -> bool {
        false
    }
}

fn scan_file(path: &Path, bytes: &[u8]) -> Result<Scan, LedgerError> {
    let scan = scan(bytes).map_err(|e| LedgerError::Corrupt {
        path: path.to_path_buf(),
        record: e.record,
        message: e.message,
    })?;
    if let Some(header) = &scan.header {
        if !header.iter().eq(COLUMNS.iter().map(|c| c.as_bytes())) {
            return Err(LedgerError::HeaderMismatch {
                path: path.to_path_buf(),
                found: String::from_utf8_lossy(header.as_slice()).into_owned(),
            });
        }
    }
    Ok(scan)
}

/// Deserialize complete rows. A repeated id keeps its last row.
fn load_entries(path: &Path, scan: &Scan) -> Result<HashMap<VideoId, LedgerEntry>, LedgerError> {
    let Some(header) = &scan.header else {
        return Ok(HashMap::new());
    };
    let mut entries = HashMap::with_capacity(scan.rows.len());
    for (number, record) in &scan.rows {
        let entry: LedgerEntry = record
            .deserialize(Some(header))
            .map_err(|e| LedgerError::Corrupt {
                path: path.to_path_buf(),
                record: *number,
                message: e.to_string(),
            })?;
        entries.insert(entry.video_id.clone(), entry);
    }
    Ok(entries)
}

fn writer() -> WriterBuilder {
    let mut b = WriterBuilder::new();
    b.has_headers(false).terminator(Terminator::Any(b'\n'));
    b
}

fn encode_header() -> Result<Vec<u8>, LedgerError> {
    let mut w = writer().from_writer(Vec::new());
    w.write_byte_record(&ByteRecord::from(COLUMNS.to_vec()))
        .map_err(|e| LedgerError::Encode(e.to_string()))?;
    w.into_inner().map_err(|e| LedgerError::Encode(e.to_string()))
}

fn encode_row(entry: &LedgerEntry) -> Result<Vec<u8>, LedgerError> {
    let mut w = writer().from_writer(Vec::new());
    w.serialize(entry)
        .map_err(|e| LedgerError::Encode(e.to_string()))?;
    w.into_inner().map_err(|e| LedgerError::Encode(e.to_string()))
}
