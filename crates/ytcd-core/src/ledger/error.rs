use std::io;
use std::path::PathBuf;

use crate::retry::{classify_io_error, ErrorKind};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("cannot access ledger {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write ledger row to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ledger {} has an unexpected header: {found}", path.display())]
    HeaderMismatch { path: PathBuf, found: String },
    #[error("ledger {} is corrupt at record {record}: {message}", path.display())]
    Corrupt {
        path: PathBuf,
        record: u64,
        message: String,
    },
    #[error("failed to encode ledger row: {0}")]
    Encode(String),
    #[error("ledger {} is open read-only", .0.display())]
    ReadOnly(PathBuf),
}

impl LedgerError {
    /// Retry class for append failures. Only I/O on write is transient.
    pub fn retry_kind(&self) -> ErrorKind {
        match self {
            LedgerError::Write { source, .. } => classify_io_error(source),
            _ => ErrorKind::Permanent,
        }
    }
}
