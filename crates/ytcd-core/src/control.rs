//! Run control: a shared interrupt token checked between jobs.
//!
//! The CLI registers a Ctrl-C handler that sets the token; the orchestrator
//! checks it before starting each job and stops cleanly, leaving every
//! completed job and its ledger row in place for the next run.

use std::sync::atomic::{AtomicBool, Ordering};

/// Shared interrupt token. Wrap in `Arc` to hand one side to a signal handler.
#[derive(Debug, Default)]
pub struct RunControl {
    interrupt: AtomicBool,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before the next job starts.
    pub fn request_interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn interrupt_is_visible_through_clones() {
        let control = Arc::new(RunControl::new());
        let handler_side = Arc::clone(&control);
        assert!(!control.is_interrupted());
        handler_side.request_interrupt();
        assert!(control.is_interrupted());
    }
}
