//! Fail-open utilities for graceful degradation
//!
//! Non-critical enrichment steps (screenshot capture, sink publication,
//! artifact writes) should degrade gracefully instead of aborting a capture.
//!
//! DO NOT use fail-open for:
//! - Selector/XPath derivation (identification correctness)
//! - Issue store reads (review state)

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an operation that should fail open
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```no_run
/// use fixhero_core::fail_open::fail_open;
/// use fixhero_core::Result;
///
/// async fn capture_screenshot() -> Result<String> {
///     // Some operation that might fail
///     Ok("data:image/png;base64,...".to_string())
/// }
///
/// async fn example() {
///     let screenshot = fail_open("screenshot", || capture_screenshot()).await;
///     // screenshot is None if the capture failed; the issue is still emitted
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
