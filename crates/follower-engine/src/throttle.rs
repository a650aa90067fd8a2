//! Delay policies used to pace requests.
//!
//! Workers and the scheduler only see [`Throttle`], so the fixed pause
//! can be replaced by a token bucket without touching either.

use async_trait::async_trait;
use std::time::Duration;

/// Pacing policy awaited between consecutive operations.
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Wait until the next operation may proceed.
    async fn pause(&self);
}

/// Sleeps for a fixed duration on every pause.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// Create a throttle sleeping for `delay`.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// A throttle that never waits.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Configured delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl Throttle for FixedDelay {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tracing::debug!("Sleeping for {:?}", self.delay);
            tokio::time::sleep(self.delay).await;
        }
    }
}
