use crate::{MEMORY_SCHEME, Result as StreamErrorResult, StreamError, subjects};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vs_config::{BrokerConfig, Config, StreamingSettings};

/// Immutable broadcaster settings. Updates build a new value that replaces
/// the old one; work already in flight keeps the snapshot it started with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamingConfig {
    pub broker_host: String,
    pub broker_port: u16,
    /// Overrides host and port when set
    pub broker_url_override: Option<String>,
    pub stream_id: String,
    pub interval_ms: u64,
    pub autostart: bool,
}

/// Fields to change; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamingConfigUpdate {
    pub broker_host: Option<String>,
    pub broker_port: Option<u16>,
    /// Empty string clears the override
    pub broker_url: Option<String>,
    pub stream_id: Option<String>,
    pub interval_ms: Option<u64>,
    pub autostart: Option<bool>,
}

impl StreamingConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self::from_sections(&BrokerConfig::default(), &StreamingSettings::default())
    }
}

impl StreamingConfig {
    pub fn from_config(config: &Config) -> Self {
        Self::from_sections(&config.broker, &config.streaming)
    }

    fn from_sections(broker: &BrokerConfig, streaming: &StreamingSettings) -> Self {
        Self {
            broker_host: broker.host.clone(),
            broker_port: broker.port,
            broker_url_override: broker.url.clone(),
            stream_id: streaming.stream_id.clone(),
            interval_ms: streaming.interval_ms,
            autostart: streaming.autostart,
        }
    }

    /// Explicit override, else derived from host and port
    pub fn broker_url(&self) -> String {
        self.broker_section().broker_url()
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// True when the broker is the in-process `memory://` one
    pub fn uses_in_process_broker(&self) -> bool {
        self.broker_url().starts_with(MEMORY_SCHEME)
    }

    /// A copy with `update` applied, validated as a whole.
    ///
    /// The transport is chosen once at startup, so an update may move
    /// between brokers of the same kind but never between `memory://` and
    /// a network broker.
    pub fn apply(&self, update: &StreamingConfigUpdate) -> StreamErrorResult<Self> {
        let mut next = self.clone();

        if let Some(host) = &update.broker_host {
            next.broker_host = host.clone();
        }
        if let Some(port) = update.broker_port {
            next.broker_port = port;
        }
        if let Some(url) = &update.broker_url {
            next.broker_url_override = (!url.is_empty()).then(|| url.clone());
        }
        if let Some(stream_id) = &update.stream_id {
            next.stream_id = stream_id.clone();
        }
        if let Some(interval_ms) = update.interval_ms {
            next.interval_ms = interval_ms;
        }
        if let Some(autostart) = update.autostart {
            next.autostart = autostart;
        }

        next.validate()?;
        if next.uses_in_process_broker() != self.uses_in_process_broker() {
            return Err(StreamError::validation(
                format!(
                    "cannot switch broker from {} to {}: transport is fixed at startup",
                    self.broker_url(),
                    next.broker_url()
                ),
                Some("broker_url"),
            ));
        }
        Ok(next)
    }

    pub fn validate(&self) -> StreamErrorResult<()> {
        subjects::validate_token(&self.stream_id, "stream ID")?;

        self.broker_section()
            .validate()
            .map_err(|e| StreamError::validation(e.to_string(), Some("broker")))?;

        StreamingSettings {
            stream_id: self.stream_id.clone(),
            interval_ms: self.interval_ms,
            autostart: self.autostart,
        }
        .validate()
        .map_err(|e| StreamError::validation(e.to_string(), Some("interval_ms")))
    }

    fn broker_section(&self) -> BrokerConfig {
        BrokerConfig {
            host: self.broker_host.clone(),
            port: self.broker_port,
            url: self.broker_url_override.clone(),
            ..BrokerConfig::default()
        }
    }
}
