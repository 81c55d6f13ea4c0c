//! Retry loop: run a closure until success or policy says stop.

use super::policy::{ErrorKind, RetryDecision, RetryPolicy};

/// Runs a synchronous operation until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps (without blocking the runtime) for the backoff
/// duration then tries again. `op` receives the 1-based attempt number.
pub async fn run_with_retry<T, E, F, C>(
    policy: &RetryPolicy,
    classify: C,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    C: Fn(&E) -> ErrorKind,
    E: std::fmt::Display,
{
    let mut attempt = 1u32;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => match policy.decide(attempt, classify(&e)) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::warn!(
                        attempt,
                        delay_ms = d.as_millis() as u64,
                        "retrying after error: {}",
                        e
                    );
                    tokio::time::sleep(d).await;
                    attempt += 1;
                }
            },
        }
    }
}
