//! Retry and backoff policy.
//!
//! Used by the ledger so a completed download's record is only given up on
//! after exponential backoff is exhausted. Error classification for I/O
//! failures lives next to the policy so callers share one decision.

mod classify;
mod policy;
mod run;

pub use classify::classify_io_error;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
