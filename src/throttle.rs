//! Fixed-delay throttle for catalog searches.
//!
//! Each operation is timed; if it finished faster than `1 / qps` seconds the
//! throttle sleeps for the remainder. It never speeds up and has no burst
//! allowance.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

/// Time source for the throttle, swapped for a fake in tests.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Spaces operations at least `1 / ops_per_sec` apart.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    ops_per_sec: u32,
    min_interval: Duration,
}

impl Throttle {
    /// A zero rate disables throttling.
    pub fn new(ops_per_sec: u32) -> Self {
        let min_interval = if ops_per_sec == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / ops_per_sec as f64)
        };
        Self {
            ops_per_sec,
            min_interval,
        }
    }

    /// Shortest time an operation may take before the throttle sleeps.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleeps for whatever is left of the minimum interval since `started`.
    /// Returns the time slept.
    pub async fn wait<C: Clock + ?Sized>(&self, clock: &C, started: Instant) -> Duration {
        let elapsed = clock.now().saturating_duration_since(started);
        if elapsed >= self.min_interval {
            return Duration::ZERO;
        }

        let remaining = self.min_interval - elapsed;
        debug!(
            "throttle: sleeping for {:.2}ms to maintain {}qps",
            remaining.as_secs_f64() * 1000.0,
            self.ops_per_sec
        );
        clock.sleep(remaining).await;
        remaining
    }
}
