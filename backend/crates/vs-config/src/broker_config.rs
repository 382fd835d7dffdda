use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_BROKER_HOST, DEFAULT_BROKER_PORT, DEFAULT_CLIENT_NAME,
};

use serde::Deserialize;

// Connect timeout constraints (seconds)
pub const MIN_CONNECT_TIMEOUT_SECS: u64 = 1;
pub const MAX_CONNECT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

// Publish timeout constraints (milliseconds)
pub const MIN_PUBLISH_TIMEOUT_MS: u64 = 10;
pub const MAX_PUBLISH_TIMEOUT_MS: u64 = 60000;
pub const DEFAULT_PUBLISH_TIMEOUT_MS: u64 = 2000;

const SUPPORTED_SCHEMES: [&str; 2] = ["nats://", "memory://"];

/// Message broker connection settings.
///
/// `url` overrides `host`/`port` when set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub host: String,
    pub port: u16,
    /// Full broker URL, e.g. `nats://broker:4222` or `memory://local`
    pub url: Option<String>,
    pub connect_timeout_secs: u64,
    /// Upper bound for a single publish call
    pub publish_timeout_ms: u64,
    /// Client name announced to the broker
    pub client_name: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_BROKER_HOST),
            port: DEFAULT_BROKER_PORT,
            url: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            publish_timeout_ms: DEFAULT_PUBLISH_TIMEOUT_MS,
            client_name: String::from(DEFAULT_CLIENT_NAME),
        }
    }
}

impl BrokerConfig {
    /// Explicit URL if configured, else derived from host and port
    pub fn broker_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("nats://{}:{}", self.host, self.port),
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(url) = &self.url {
            if !SUPPORTED_SCHEMES.iter().any(|s| url.starts_with(s)) {
                return Err(ConfigError::broker(format!(
                    "broker.url must start with one of {:?}, got {}",
                    SUPPORTED_SCHEMES, url
                )));
            }
        } else {
            if self.host.trim().is_empty() {
                return Err(ConfigError::broker("broker.host cannot be empty"));
            }
            if self.port == 0 {
                return Err(ConfigError::broker("broker.port cannot be 0"));
            }
        }

        if self.connect_timeout_secs < MIN_CONNECT_TIMEOUT_SECS
            || self.connect_timeout_secs > MAX_CONNECT_TIMEOUT_SECS
        {
            return Err(ConfigError::broker(format!(
                "broker.connect_timeout_secs must be {}-{}, got {}",
                MIN_CONNECT_TIMEOUT_SECS, MAX_CONNECT_TIMEOUT_SECS, self.connect_timeout_secs
            )));
        }

        if self.publish_timeout_ms < MIN_PUBLISH_TIMEOUT_MS
            || self.publish_timeout_ms > MAX_PUBLISH_TIMEOUT_MS
        {
            return Err(ConfigError::broker(format!(
                "broker.publish_timeout_ms must be {}-{}, got {}",
                MIN_PUBLISH_TIMEOUT_MS, MAX_PUBLISH_TIMEOUT_MS, self.publish_timeout_ms
            )));
        }

        Ok(())
    }
}
