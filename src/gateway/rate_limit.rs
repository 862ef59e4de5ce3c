//! Sliding-window request ceiling.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::{GatewayError, GatewayResult};

/// Snapshot of rate limiter usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateUsage {
    /// Calls made within the current window.
    pub used: usize,
    /// Calls allowed within one window.
    pub limit: usize,
    /// Window length in seconds.
    pub window_secs: u64,
}

impl RateUsage {
    /// Calls still allowed in the current window.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.used)
    }
}

/// Counts emitted calls within a sliding window.
///
/// # Example
///
/// ```
/// use sgk_gateway::gateway::RateLimiter;
/// use std::time::{Duration, Instant};
///
/// let mut limiter = RateLimiter::new(2, Duration::from_secs(60));
/// let now = Instant::now();
/// limiter.try_acquire(now).unwrap();
/// limiter.try_acquire(now).unwrap();
/// assert!(limiter.try_acquire(now).is_err());
/// assert!(limiter.try_acquire(now + Duration::from_secs(61)).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    /// Creates a limiter allowing `limit` calls per `window`.
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            calls: VecDeque::with_capacity(limit),
        }
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.calls.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Fails with [`GatewayError::RateLimited`] when no call is available.
    pub fn check(&mut self, now: Instant) -> GatewayResult<()> {
        self.prune(now);
        if self.calls.len() >= self.limit {
            return Err(GatewayError::RateLimited {
                limit: self.limit,
                window_secs: self.window.as_secs(),
            });
        }
        Ok(())
    }

    /// Records an emitted call.
    pub fn record(&mut self, now: Instant) {
        self.prune(now);
        self.calls.push_back(now);
    }

    /// Checks and records in one step.
    pub fn try_acquire(&mut self, now: Instant) -> GatewayResult<()> {
        self.check(now)?;
        self.record(now);
        Ok(())
    }

    /// Usage at `now`.
    pub fn usage(&self, now: Instant) -> RateUsage {
        let used = self
            .calls
            .iter()
            .filter(|&&at| now.saturating_duration_since(at) < self.window)
            .count();
        RateUsage {
            used,
            limit: self.limit,
            window_secs: self.window.as_secs(),
        }
    }
}
