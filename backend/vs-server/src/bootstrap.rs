//! Wires config into a running orchestrator and tool dispatcher.

use crate::error::Result as ServerErrorResult;
use crate::seed;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::info;
use vs_config::Config;
use vs_stream::{
    BrokerConnectionManager, BrokerTransport, InProcessBroker, MEMORY_SCHEME, NatsOptions,
    NatsTransport, StreamingConfig, StreamingOrchestrator, TokenBucket,
};
use vs_tools::{RateLimiterFactory, ToolDispatcher};

/// `memory://` URLs get the in-process broker, anything else speaks NATS
pub fn select_transport(config: &Config) -> Arc<dyn BrokerTransport> {
    let url = config.broker.broker_url();
    if url.starts_with(MEMORY_SCHEME) {
        info!("Using in-process broker at {}", url);
        Arc::new(InProcessBroker::new())
    } else {
        info!("Using NATS broker at {}", url);
        Arc::new(NatsTransport::new(NatsOptions::from_config(
            &config.broker,
            &config.reconnect,
        )))
    }
}

/// Must run inside a Tokio runtime when `streaming.autostart` is set
pub fn build_dispatcher(config: &Config, config_dir: &Path) -> ServerErrorResult<ToolDispatcher> {
    let seed_path = config.seed_path(config_dir);
    let repository = seed::load_repository(seed_path.as_deref())?;

    let connection = Arc::new(BrokerConnectionManager::new(
        select_transport(config),
        Duration::from_millis(config.broker.publish_timeout_ms),
    ));
    let rate_limiter = Arc::new(TokenBucket::from_config(&config.publish_limit));

    let orchestrator = StreamingOrchestrator::new(
        StreamingConfig::from_config(config),
        connection,
        Arc::new(repository),
        rate_limiter,
    )?;

    Ok(ToolDispatcher::new(
        orchestrator,
        RateLimiterFactory::new(config.request_limit.clone()),
    ))
}
