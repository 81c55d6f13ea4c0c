//! Ctrl-C handling for `ytcd download`.
//!
//! The first Ctrl-C asks the run to stop after the current video; a second
//! one exits immediately with status 130.

use std::sync::Arc;
use tokio::task::JoinHandle;
use ytcd_core::control::RunControl;

/// Listens for Ctrl-C while alive.
pub struct InterruptGuard(JoinHandle<()>);

impl InterruptGuard {
    pub fn install(control: Arc<RunControl>) -> Self {
        Self(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("could not install Ctrl-C handler");
                return;
            }
            eprintln!("\nInterrupt received; stopping after the current video (Ctrl-C again to quit now).");
            tracing::info!("interrupt requested by user");
            control.request_interrupt();
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Cancelled by user");
                std::process::exit(130);
            }
        }))
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
