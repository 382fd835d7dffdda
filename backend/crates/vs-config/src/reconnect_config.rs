use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// 0 means keep trying until the connection is closed
pub const MAX_RECONNECT_ATTEMPTS: u32 = 1000;
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 0;

pub const MIN_INITIAL_DELAY_MS: u64 = 10;
pub const MAX_INITIAL_DELAY_MS: u64 = 60_000;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 250;

pub const MIN_MAX_DELAY_SECS: u64 = 1;
pub const MAX_MAX_DELAY_SECS: u64 = 300;
pub const DEFAULT_MAX_DELAY_SECS: u64 = 30;

pub const MIN_BACKOFF_MULTIPLIER: f64 = 1.0;
pub const MAX_BACKOFF_MULTIPLIER: f64 = 10.0;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Supervised reconnect after the broker connection drops
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub enabled: bool,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_secs: u64,
    pub backoff_multiplier: f64,
    /// Randomize each delay between 50% and 150%
    pub jitter: bool,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            jitter: true,
        }
    }
}

impl ReconnectConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_attempts > MAX_RECONNECT_ATTEMPTS {
            return Err(ConfigError::broker(format!(
                "reconnect.max_attempts must be 0 (unlimited) or at most {}, got {}",
                MAX_RECONNECT_ATTEMPTS, self.max_attempts
            )));
        }

        if !(MIN_INITIAL_DELAY_MS..=MAX_INITIAL_DELAY_MS).contains(&self.initial_delay_ms) {
            return Err(ConfigError::broker(format!(
                "reconnect.initial_delay_ms must be {}-{}, got {}",
                MIN_INITIAL_DELAY_MS, MAX_INITIAL_DELAY_MS, self.initial_delay_ms
            )));
        }

        if !(MIN_MAX_DELAY_SECS..=MAX_MAX_DELAY_SECS).contains(&self.max_delay_secs) {
            return Err(ConfigError::broker(format!(
                "reconnect.max_delay_secs must be {}-{}, got {}",
                MIN_MAX_DELAY_SECS, MAX_MAX_DELAY_SECS, self.max_delay_secs
            )));
        }

        if !(MIN_BACKOFF_MULTIPLIER..=MAX_BACKOFF_MULTIPLIER).contains(&self.backoff_multiplier) {
            return Err(ConfigError::broker(format!(
                "reconnect.backoff_multiplier must be {}-{}, got {}",
                MIN_BACKOFF_MULTIPLIER, MAX_BACKOFF_MULTIPLIER, self.backoff_multiplier
            )));
        }

        Ok(())
    }
}
