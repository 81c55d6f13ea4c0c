//! Metadata ledger: the durable record of completed downloads.
//!
//! The ledger is the source of truth for resume. An id present in the
//! ledger is never planned again while skip-existing is on.

mod entry;
mod error;
mod scan;
mod store;

use async_trait::async_trait;
use std::collections::HashSet;

use crate::listing::VideoId;

pub use entry::{LedgerEntry, COLUMNS};
pub use error::LedgerError;
pub use store::CsvLedger;

/// Read and append access to completed-download records.
#[async_trait]
pub trait Ledger: Send {
    fn has(&self, id: &VideoId) -> bool;

    fn load_all(&self) -> HashSet<VideoId>;

    /// Durably append one entry. Either the whole row is persisted or
    /// nothing is, and transient failures are retried before erroring.
    async fn append(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError>;
}
