//! Timing helpers for page operations
//!
//! Navigation can hang on slow DNS, unresponsive servers or pages that never
//! fire their load event, and a loaded page may still be rendering its
//! results with JavaScript.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation`, failing with a descriptive error after `timeout_secs`.
///
/// # Returns
/// * `Ok(T)` - Operation completed in time
/// * `Err` - The operation failed or the timeout was reached
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout_secs: u64,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_secs(timeout_secs), operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {timeout_secs} seconds"
        )),
    }
}

/// Re-run `check` every `interval` until it reports `true` or `limit` passes.
///
/// Returns whether the condition was met. `check` always runs at least once.
pub async fn poll_until<F, Fut>(mut check: F, limit: Duration, interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + limit;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}
