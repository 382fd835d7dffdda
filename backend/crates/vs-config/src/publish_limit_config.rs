use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_PUBLISH_CAPACITY: u32 = 1;
pub const MAX_PUBLISH_CAPACITY: u32 = 100_000;
pub const DEFAULT_PUBLISH_CAPACITY: u32 = 100;

pub const MIN_REFILL_RATE: u32 = 1;
pub const MAX_REFILL_RATE: u32 = 100_000;
pub const DEFAULT_REFILL_RATE: u32 = 10;

pub const MIN_REFILL_INTERVAL_MS: u64 = 1;
pub const MAX_REFILL_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_REFILL_INTERVAL_MS: u64 = 1000;

/// Token bucket guarding outbound publish volume
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishLimitConfig {
    /// Burst capacity
    pub capacity: u32,
    /// Tokens added per refill interval
    pub refill_rate: u32,
    pub refill_interval_ms: u64,
}

impl Default for PublishLimitConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PUBLISH_CAPACITY,
            refill_rate: DEFAULT_REFILL_RATE,
            refill_interval_ms: DEFAULT_REFILL_INTERVAL_MS,
        }
    }
}

impl PublishLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.capacity < MIN_PUBLISH_CAPACITY || self.capacity > MAX_PUBLISH_CAPACITY {
            return Err(ConfigError::config(format!(
                "publish_limit.capacity must be {}-{}, got {}",
                MIN_PUBLISH_CAPACITY, MAX_PUBLISH_CAPACITY, self.capacity
            )));
        }

        if self.refill_rate < MIN_REFILL_RATE || self.refill_rate > MAX_REFILL_RATE {
            return Err(ConfigError::config(format!(
                "publish_limit.refill_rate must be {}-{}, got {}",
                MIN_REFILL_RATE, MAX_REFILL_RATE, self.refill_rate
            )));
        }

        if self.refill_interval_ms < MIN_REFILL_INTERVAL_MS
            || self.refill_interval_ms > MAX_REFILL_INTERVAL_MS
        {
            return Err(ConfigError::config(format!(
                "publish_limit.refill_interval_ms must be {}-{}, got {}",
                MIN_REFILL_INTERVAL_MS, MAX_REFILL_INTERVAL_MS, self.refill_interval_ms
            )));
        }

        Ok(())
    }
}
