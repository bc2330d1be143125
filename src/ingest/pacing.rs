//! Cooperative pacing between consecutive calls to one source.

use std::time::Duration;

use tokio::time::sleep;

/// Fixed pause awaited after every item, whatever its outcome.
///
/// Sleep-after-call only; there is no token bucket and no shared state, so
/// each adapter owns its own gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayGate {
    delay: Duration,
}

impl Default for DelayGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl DelayGate {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}
