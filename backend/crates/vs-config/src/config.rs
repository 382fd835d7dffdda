use crate::{
    BrokerConfig, CONFIG_DIR_ENV, CONFIG_FILENAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, PublishLimitConfig, ReconnectConfig, RequestLimitConfig,
    SeedConfig, StreamingSettings,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub broker: BrokerConfig,
    pub streaming: StreamingSettings,
    pub publish_limit: PublishLimitConfig,
    pub request_limit: RequestLimitConfig,
    pub reconnect: ReconnectConfig,
    pub logging: LoggingConfig,
    pub seed: SeedConfig,
}

impl Config {
    /// Load config from the default config directory.
    ///
    /// Loading order:
    /// 1. Check for VS_CONFIG_DIR env var, else use ./.vibestream/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply VS_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        Self::load_from(&Self::config_dir()?)
    }

    /// Same as `load()` with an explicit config directory
    pub fn load_from(config_dir: &Path) -> ConfigErrorResult<Self> {
        let config_path = config_dir.join(CONFIG_FILENAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: VS_CONFIG_DIR env var > ./.vibestream/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.broker.validate()?;
        self.streaming.validate()?;
        self.publish_limit.validate()?;
        self.request_limit.validate()?;
        self.reconnect.validate()?;
        self.seed.validate()?;

        if let Some(file) = &self.logging.file
            && (file.contains('/') || file.contains('\\'))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a bare file name, got {file}"
            )));
        }

        Ok(())
    }

    /// Absolute path of the seed file, if one is configured
    pub fn seed_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.seed.path.as_ref().map(|path| config_dir.join(path))
    }

    /// Absolute path of the log file, if file logging is configured
    pub fn log_file_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.logging
            .file
            .as_ref()
            .map(|file| config_dir.join(&self.logging.dir).join(file))
    }

    /// Log configuration summary
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  broker: {} (connect timeout {}s, publish timeout {}ms, client '{}')",
            self.broker.broker_url(),
            self.broker.connect_timeout_secs,
            self.broker.publish_timeout_ms,
            self.broker.client_name
        );
        info!(
            "  streaming: stream_id={}, interval={}ms, autostart={}",
            self.streaming.stream_id, self.streaming.interval_ms, self.streaming.autostart
        );
        info!(
            "  publish_limit: capacity={}, refill={}/{}ms",
            self.publish_limit.capacity,
            self.publish_limit.refill_rate,
            self.publish_limit.refill_interval_ms
        );
        info!(
            "  request_limit: {} ({}/{}s)",
            if self.request_limit.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.request_limit.max_requests,
            self.request_limit.window_secs
        );
        info!(
            "  reconnect: enabled={}, attempts={}, initial={}ms, max={}s, backoff={}x",
            self.reconnect.enabled,
            self.reconnect.max_attempts,
            self.reconnect.initial_delay_ms,
            self.reconnect.max_delay_secs,
            self.reconnect.backoff_multiplier
        );
        info!(
            "  logging: {} (colored: {})",
            self.logging.level, self.logging.colored
        );
        if let Some(path) = &self.seed.path {
            info!("  seed: {}", path);
        }
    }

    fn apply_env_overrides(&mut self) {
        // Broker
        Self::apply_env_string("VS_BROKER_HOST", &mut self.broker.host);
        Self::apply_env_parse("VS_BROKER_PORT", &mut self.broker.port);
        Self::apply_env_option_string("VS_BROKER_URL", &mut self.broker.url);
        Self::apply_env_parse(
            "VS_BROKER_CONNECT_TIMEOUT_SECS",
            &mut self.broker.connect_timeout_secs,
        );
        Self::apply_env_parse(
            "VS_BROKER_PUBLISH_TIMEOUT_MS",
            &mut self.broker.publish_timeout_ms,
        );
        Self::apply_env_string("VS_BROKER_CLIENT_NAME", &mut self.broker.client_name);

        // Streaming
        Self::apply_env_string("VS_STREAM_ID", &mut self.streaming.stream_id);
        Self::apply_env_parse("VS_STREAM_INTERVAL_MS", &mut self.streaming.interval_ms);
        Self::apply_env_bool("VS_STREAM_AUTOSTART", &mut self.streaming.autostart);

        // Publish limit
        Self::apply_env_parse(
            "VS_PUBLISH_LIMIT_CAPACITY",
            &mut self.publish_limit.capacity,
        );
        Self::apply_env_parse(
            "VS_PUBLISH_LIMIT_REFILL_RATE",
            &mut self.publish_limit.refill_rate,
        );
        Self::apply_env_parse(
            "VS_PUBLISH_LIMIT_REFILL_INTERVAL_MS",
            &mut self.publish_limit.refill_interval_ms,
        );

        // Request limit
        Self::apply_env_bool("VS_REQUEST_LIMIT_ENABLED", &mut self.request_limit.enabled);
        Self::apply_env_parse(
            "VS_REQUEST_LIMIT_MAX_REQUESTS",
            &mut self.request_limit.max_requests,
        );
        Self::apply_env_parse(
            "VS_REQUEST_LIMIT_WINDOW_SECS",
            &mut self.request_limit.window_secs,
        );

        // Reconnect
        Self::apply_env_bool("VS_RECONNECT_ENABLED", &mut self.reconnect.enabled);
        Self::apply_env_parse(
            "VS_RECONNECT_MAX_ATTEMPTS",
            &mut self.reconnect.max_attempts,
        );
        Self::apply_env_parse(
            "VS_RECONNECT_INITIAL_DELAY_MS",
            &mut self.reconnect.initial_delay_ms,
        );
        Self::apply_env_parse(
            "VS_RECONNECT_MAX_DELAY_SECS",
            &mut self.reconnect.max_delay_secs,
        );
        Self::apply_env_parse(
            "VS_RECONNECT_BACKOFF_MULTIPLIER",
            &mut self.reconnect.backoff_multiplier,
        );
        Self::apply_env_bool("VS_RECONNECT_JITTER", &mut self.reconnect.jitter);

        // Logging
        Self::apply_env_parse("VS_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("VS_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("VS_LOG_FILE", &mut self.logging.file);

        // Seed
        Self::apply_env_option_string("VS_SEED_PATH", &mut self.seed.path);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
