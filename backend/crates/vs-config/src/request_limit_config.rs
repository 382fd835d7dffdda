use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_REQUESTS_PER_WINDOW: u32 = 1;
pub const MAX_REQUESTS_PER_WINDOW: u32 = 10_000;
pub const DEFAULT_REQUESTS_PER_WINDOW: u32 = 120;

pub const MIN_WINDOW_SECS: u64 = 1;
pub const MAX_WINDOW_SECS: u64 = 3600;
pub const DEFAULT_WINDOW_SECS: u64 = 60;

/// Per-caller limit on tool requests (start/stop/status/publish/config)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RequestLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: DEFAULT_REQUESTS_PER_WINDOW,
            window_secs: DEFAULT_WINDOW_SECS,
        }
    }
}

impl RequestLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.enabled {
            return Ok(());
        }

        if !(MIN_REQUESTS_PER_WINDOW..=MAX_REQUESTS_PER_WINDOW).contains(&self.max_requests) {
            return Err(ConfigError::config(format!(
                "request_limit.max_requests must be {}-{}, got {}",
                MIN_REQUESTS_PER_WINDOW, MAX_REQUESTS_PER_WINDOW, self.max_requests
            )));
        }

        if !(MIN_WINDOW_SECS..=MAX_WINDOW_SECS).contains(&self.window_secs) {
            return Err(ConfigError::config(format!(
                "request_limit.window_secs must be {}-{}, got {}",
                MIN_WINDOW_SECS, MAX_WINDOW_SECS, self.window_secs
            )));
        }

        if u64::from(self.max_requests) < self.window_secs {
            return Err(ConfigError::config(format!(
                "request_limit allows less than one request per second ({} per {}s)",
                self.max_requests, self.window_secs
            )));
        }

        Ok(())
    }
}
