#![allow(dead_code)]

pub(crate) mod fake_nats_server;

use std::sync::Arc;
use std::time::Duration;

use vs_core::{ContextLevel, InMemoryRepository, SharingPolicy, Vibe, World};
use vs_stream::{
    BrokerConnectionManager, InProcessBroker, StreamingConfig, StreamingOrchestrator, TokenBucket,
};

pub const MEMORY_URL: &str = "memory://test";

/// Repository with a public "office" (occupancy 5) and a private "lab"
pub fn seeded_repository() -> InMemoryRepository {
    let repository = InMemoryRepository::new();
    repository
        .upsert_vibe(Vibe::new("focus", "Focus", "calm", 0.3))
        .unwrap();

    let mut office = World::new("office", "Office", "owner");
    office.occupancy = 5;
    office.current_vibe_id = Some(String::from("focus"));
    office.sharing = SharingPolicy::public(ContextLevel::Partial);
    repository.upsert_world(office).unwrap();

    let mut lab = World::new("lab", "Lab", "owner");
    lab.sharing = SharingPolicy::private().with_allowed_users(["bob"]);
    repository.upsert_world(lab).unwrap();

    repository
}

pub fn memory_config() -> StreamingConfig {
    StreamingConfig {
        broker_url_override: Some(String::from(MEMORY_URL)),
        interval_ms: 100,
        ..StreamingConfig::default()
    }
}

pub struct TestHarness {
    pub broker: InProcessBroker,
    pub repository: InMemoryRepository,
    pub connection: Arc<BrokerConnectionManager>,
    pub orchestrator: StreamingOrchestrator,
}

pub fn harness_with(config: StreamingConfig, bucket: TokenBucket) -> TestHarness {
    let broker = InProcessBroker::new();
    let repository = seeded_repository();
    let connection = Arc::new(BrokerConnectionManager::new(
        Arc::new(broker.clone()),
        Duration::from_millis(500),
    ));
    let orchestrator = StreamingOrchestrator::new(
        config,
        Arc::clone(&connection),
        Arc::new(repository.clone()),
        Arc::new(bucket),
    )
    .unwrap();

    TestHarness {
        broker,
        repository,
        connection,
        orchestrator,
    }
}

pub fn harness() -> TestHarness {
    harness_with(
        memory_config(),
        TokenBucket::new(100, 10, Duration::from_secs(1)),
    )
}

/// Poll `condition` for up to half a second
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    for _ in 0..50 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
