//! Token bucket admission control for outbound publishes.
//!
//! `try_acquire` never blocks. A `false` result means the caller should skip
//! the work or surface a rate-limit error, not wait and retry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use vs_config::PublishLimitConfig;

/// Time source for the bucket, swappable in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

struct BucketState {
    tokens: u32,
    last_refill: Instant,
}

pub struct TokenBucket {
    capacity: u32,
    refill_rate: u32,
    refill_interval: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Full bucket of `capacity` tokens, adding `refill_rate` every `refill_interval`
    pub fn new(capacity: u32, refill_rate: u32, refill_interval: Duration) -> Self {
        Self::with_clock(capacity, refill_rate, refill_interval, Arc::new(SystemClock))
    }

    pub fn with_clock(
        capacity: u32,
        refill_rate: u32,
        refill_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let last_refill = clock.now();
        Self {
            capacity,
            refill_rate,
            refill_interval: refill_interval.max(Duration::from_millis(1)),
            clock,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill,
            }),
        }
    }

    pub fn from_config(config: &PublishLimitConfig) -> Self {
        Self::new(
            config.capacity,
            config.refill_rate,
            Duration::from_millis(config.refill_interval_ms),
        )
    }

    /// Take one token if available
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);

        if state.tokens >= 1 {
            state.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens currently available, after applying any pending refill
    pub fn available(&self) -> u32 {
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.tokens
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn refill(&self, state: &mut BucketState) {
        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(state.last_refill);
        let intervals = elapsed.as_nanos() / self.refill_interval.as_nanos();
        if intervals == 0 || self.refill_rate == 0 {
            return;
        }

        let added = intervals.saturating_mul(u128::from(self.refill_rate));
        let tokens = u128::from(state.tokens).saturating_add(added);

        if tokens >= u128::from(self.capacity) {
            state.tokens = self.capacity;
            state.last_refill = now;
        } else {
            // intervals < capacity here, so the cast cannot truncate
            state.tokens = tokens as u32;
            state.last_refill += self.refill_interval * intervals as u32;
        }
    }
}

impl std::fmt::Debug for TokenBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenBucket")
            .field("capacity", &self.capacity)
            .field("refill_rate", &self.refill_rate)
            .field("refill_interval", &self.refill_interval)
            .finish_non_exhaustive()
    }
}
