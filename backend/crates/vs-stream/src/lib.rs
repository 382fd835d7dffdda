pub mod connection_manager;
pub mod connection_status;
pub mod error;
pub mod in_process_broker;
pub mod metrics;
pub mod moment_generator;
pub mod nats_transport;
pub mod orchestrator;
pub mod rate_limiter;
pub mod retry;
pub mod stop_signal;
pub mod streaming_config;
pub mod subjects;
pub mod transport;
pub mod vibe_update;

pub use connection_manager::{BrokerConnectionManager, DEFAULT_PUBLISH_TIMEOUT, PublishReport};
pub use connection_status::ConnectionStatus;
pub use error::{Result, StreamError, SubjectFailure};
pub use in_process_broker::{InProcessBroker, MEMORY_SCHEME, PublishedMessage};
pub use metrics::Metrics;
pub use moment_generator::{GeneratedMoments, MomentGenerator, WorldFailure, activity_level};
pub use nats_transport::{NATS_SCHEME, NatsOptions, NatsTransport};
pub use orchestrator::{
    PublishedMoment, StreamingOrchestrator, StreamingStatus, TickOutcome, TickReport,
};
pub use rate_limiter::{Clock, ManualClock, SystemClock, TokenBucket};
pub use retry::{Backoff, IsRetryable, RetryConfig, with_retry};
pub use stop_signal::{StopGuard, StopSignal};
pub use streaming_config::{StreamingConfig, StreamingConfigUpdate};
pub use subjects::{Audience, Subject};
pub use transport::{BrokerTransport, ServerInfo, TransportEvent};
pub use vibe_update::VibeUpdate;

#[cfg(test)]
mod tests;

use tracing::info_span;

/// Create a tracing span for one broadcast tick.
/// All log entries within the tick will include these fields.
pub fn create_tick_span(stream_id: &str, tick: u64) -> tracing::Span {
    info_span!("broadcast_tick", stream_id = %stream_id, tick = tick)
}
