//! Process-wide request pacing.
//!
//! `RateLimiter` admits at most `tps` calls per second across every worker
//! sharing it, spaced strictly `1/tps` apart. There is no burst allowance:
//! idle time does not accumulate credit.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Stand-in for "never" when a slot cannot be represented as an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Global, non-bursting rate limiter.
///
/// The only mutable state is the next free slot. Reading it and pushing it
/// forward happen under one lock acquisition, so two callers can never be
/// handed the same slot. Waiting happens after the lock is released.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    next_allowed: Mutex<Instant>,
}

impl RateLimiter {
    /// Create a limiter for `tps` requests per second.
    ///
    /// `None`, zero, negative or non-finite rates disable limiting and
    /// `acquire()` becomes a no-op. Rates so small that `1/tps` overflows a
    /// `Duration` saturate to `Duration::MAX`.
    pub fn new(tps: Option<f64>) -> Self {
        let interval = tps
            .filter(|tps| tps.is_finite() && *tps > 0.0)
            .map(|tps| Duration::try_from_secs_f64(1.0 / tps).unwrap_or(Duration::MAX));
        Self {
            interval,
            next_allowed: Mutex::new(Instant::now()),
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(None)
    }

    /// Minimum spacing between admitted calls, if limiting is enabled.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_limited(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait until the caller may issue its next request.
    ///
    /// Cancelling the returned future while it sleeps only forfeits the
    /// reserved slot; the shared state stays consistent.
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let (slot, now) = self.reserve(interval);
        if slot > now {
            tracing::trace!(
                wait_ms = (slot - now).as_millis() as u64,
                "rate limiter delaying request"
            );
            sleep_until(slot).await;
        }
    }

    /// Claim the next free slot and advance the gate by one interval.
    fn reserve(&self, interval: Duration) -> (Instant, Instant) {
        let mut next_allowed = self
            .next_allowed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let slot = (*next_allowed).max(now);
        *next_allowed = slot
            .checked_add(interval)
            .or_else(|| slot.checked_add(FAR_FUTURE))
            .unwrap_or(slot);
        (slot, now)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}
