#![allow(dead_code)]

//! Test infrastructure for the tool loop

use vs_config::Config;
use vs_server::build_dispatcher;
use vs_tools::ToolDispatcher;

use tempfile::TempDir;

const SEED_JSON: &str = r#"{
    "vibes": [ { "id": "focus", "name": "Focus", "mood": "calm", "energy": 0.3 } ],
    "worlds": [
        {
            "id": "office",
            "name": "Office",
            "owner_id": "owner",
            "current_vibe_id": "focus",
            "sharing": { "is_public": true }
        }
    ]
}"#;

/// Dispatcher over an in-process broker with one seeded world.
/// Keep the `TempDir` alive for the duration of the test.
pub fn create_test_dispatcher() -> (TempDir, ToolDispatcher) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("seed.json"), SEED_JSON).unwrap();

    let mut config = Config::default();
    config.broker.url = Some(String::from("memory://tool-loop"));
    config.seed.path = Some(String::from("seed.json"));

    let dispatcher = build_dispatcher(&config, dir.path()).unwrap();
    (dir, dispatcher)
}
