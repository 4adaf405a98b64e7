//! Bounded exponential backoff around single remote calls
//!
//! Every gateway call in the pipeline goes through [`RetryPolicy::execute`].
//! The policy also owns the run's cancellation token, so one check before
//! each attempt covers every remote call.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Result, UploadsError};

/// Retry configuration and cancellation for remote calls
///
/// The wait before retry `n` (counting from 1) is
/// `multiplier * 2^n`, clamped to `[min_wait, max_wait]`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one (default: 3)
    pub max_attempts: u32,
    /// Base unit of the exponential wait (default: 1s)
    pub multiplier: Duration,
    /// Shortest wait between attempts (default: 4s)
    pub min_wait: Duration,
    /// Longest wait between attempts (default: 10s)
    pub max_wait: Duration,
    cancel: CancellationToken,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            min_wait: Duration::from_secs(4),
            max_wait: Duration::from_secs(10),
            cancel: CancellationToken::new(),
        }
    }
}

impl RetryPolicy {
    /// Replace the cancellation token checked before each attempt
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Wait before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.min(16);
        self.multiplier
            .saturating_mul(factor)
            .clamp(self.min_wait, self.max_wait.max(self.min_wait))
    }

    /// Run `work`, retrying failures for which [`UploadsError::is_transient`] holds
    ///
    /// # Errors
    /// - `Cancelled` if the token fires before an attempt or during a wait
    /// - the first permanent failure, unchanged
    /// - the last transient failure once attempts are exhausted
    pub async fn execute<T, F, Fut>(&self, operation: &str, work: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.execute_with(operation, UploadsError::is_transient, work)
            .await
    }

    /// Like [`execute`](Self::execute) with an explicit transient/permanent classifier
    pub async fn execute_with<T, F, Fut, C>(
        &self,
        operation: &str,
        is_transient: C,
        mut work: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        C: Fn(&UploadsError) -> bool,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if self.cancel.is_cancelled() {
                return Err(UploadsError::Cancelled);
            }

            match work().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && is_transient(&e) => {
                    let wait = self.backoff(attempt);
                    tracing::warn!(
                        operation,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        error = %e,
                        "transient failure, retrying"
                    );

                    tokio::select! {
                        _ = self.cancel.cancelled() => return Err(UploadsError::Cancelled),
                        _ = tokio::time::sleep(wait) => {}
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
