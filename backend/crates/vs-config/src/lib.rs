mod broker_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod publish_limit_config;
mod reconnect_config;
mod request_limit_config;
mod seed_config;
mod streaming_config;

#[cfg(test)]
mod tests;

pub use broker_config::BrokerConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use publish_limit_config::PublishLimitConfig;
pub use reconnect_config::ReconnectConfig;
pub use request_limit_config::RequestLimitConfig;
pub use seed_config::SeedConfig;
pub use streaming_config::StreamingSettings;

const CONFIG_DIR_ENV: &str = "VS_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".vibestream";
const CONFIG_FILENAME: &str = "config.toml";

const DEFAULT_BROKER_HOST: &str = "127.0.0.1";
const DEFAULT_BROKER_PORT: u16 = 4222;
const DEFAULT_CLIENT_NAME: &str = "vibestream";

const DEFAULT_STREAM_ID: &str = "ies";

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
