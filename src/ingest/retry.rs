//! Bounded retry with linear backoff.

use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;
use tracing::warn;

/// Attempt budget plus the backoff unit.
///
/// After the `k`-th failed attempt the executor sleeps `base_delay * k`
/// before trying again. No jitter, no circuit breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Delay slept after the given (1-based) failed attempt.
    pub fn backoff(&self, attempts_used: u32) -> Duration {
        self.base_delay.saturating_mul(attempts_used)
    }

    /// Invoke `op` until it succeeds or the budget runs out.
    ///
    /// The final error is returned as produced by `op`. A zero budget still
    /// makes one attempt.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let budget = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < budget => {
                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        budget,
                        delay_ms = delay.as_millis() as u64,
                        %err,
                        "attempt failed, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
