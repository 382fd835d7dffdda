use crate::{ConfigError, ConfigErrorResult, DEFAULT_STREAM_ID};

use serde::Deserialize;

// Broadcast interval constraints (milliseconds)
pub const MIN_INTERVAL_MS: u64 = 100;
pub const MAX_INTERVAL_MS: u64 = 3_600_000;
pub const DEFAULT_INTERVAL_MS: u64 = 5000;

/// Broadcast loop settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingSettings {
    /// Tenant prefix applied to every subject
    pub stream_id: String,
    pub interval_ms: u64,
    /// Start broadcasting as soon as the server is up
    pub autostart: bool,
}

impl Default for StreamingSettings {
    fn default() -> Self {
        Self {
            stream_id: String::from(DEFAULT_STREAM_ID),
            interval_ms: DEFAULT_INTERVAL_MS,
            autostart: false,
        }
    }
}

impl StreamingSettings {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.stream_id.is_empty()
            || self
                .stream_id
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '.' | '*' | '>'))
        {
            return Err(ConfigError::streaming(format!(
                "streaming.stream_id must be a single non-empty subject token, got '{}'",
                self.stream_id
            )));
        }

        if self.interval_ms < MIN_INTERVAL_MS || self.interval_ms > MAX_INTERVAL_MS {
            return Err(ConfigError::streaming(format!(
                "streaming.interval_ms must be {}-{}, got {}",
                MIN_INTERVAL_MS, MAX_INTERVAL_MS, self.interval_ms
            )));
        }

        Ok(())
    }
}
