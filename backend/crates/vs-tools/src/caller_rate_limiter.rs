use crate::{Result as ToolErrorResult, ToolError};

use std::num::NonZeroU32;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use error_location::ErrorLocation;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use log::debug;
use vs_config::RequestLimitConfig;

/// Checks between sweeps of idle callers
pub const DEFAULT_PRUNE_EVERY: u64 = 1024;

/// Request budgets keyed by caller: each caller gets `max_requests` per
/// `window_secs`, with the full window available as an initial burst.
///
/// Callers whose budget has fully refilled hold no state worth keeping and
/// are swept out every `prune_every` checks.
pub struct CallerRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    config: RequestLimitConfig,
    checks: AtomicU64,
    prune_every: u64,
}

impl CallerRateLimiter {
    pub fn new(config: RequestLimitConfig) -> Self {
        Self {
            limiter: RateLimiter::keyed(quota(&config)),
            config,
            checks: AtomicU64::new(0),
            prune_every: DEFAULT_PRUNE_EVERY,
        }
    }

    pub fn with_prune_every(mut self, prune_every: u64) -> Self {
        self.prune_every = prune_every.max(1);
        self
    }

    #[track_caller]
    pub fn check(&self, caller: &str) -> ToolErrorResult<()> {
        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks % self.prune_every == 0 {
            self.prune_idle();
        }

        self.limiter
            .check_key(&caller.to_string())
            .map_err(|_| ToolError::RateLimitExceeded {
                limit: self.config.max_requests,
                window_secs: self.config.window_secs,
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Drop callers whose budget is back to full
    pub fn prune_idle(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(
            "Pruned idle callers: {} -> {} tracked",
            before,
            self.limiter.len()
        );
    }

    /// Callers currently holding limiter state
    pub fn tracked_callers(&self) -> usize {
        self.limiter.len()
    }
}

fn quota(config: &RequestLimitConfig) -> Quota {
    let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
    let period = Duration::from_secs(config.window_secs.max(1)) / burst.get();

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(burst))
        .allow_burst(burst)
}
