use crate::ServerError;
use crate::seed::load_repository;
use crate::tests::{SEED_JSON, write_file};

use googletest::prelude::*;
use tempfile::TempDir;
use vs_core::Repository;

#[test]
fn given_no_seed_path_when_load_then_empty_repository() {
    let repository = load_repository(None).unwrap();

    assert_that!(repository.world_count(), eq(0));
}

#[test]
fn given_missing_seed_file_when_load_then_empty_repository() {
    let dir = TempDir::new().unwrap();

    let repository = load_repository(Some(&dir.path().join("seed.json"))).unwrap();

    assert_that!(repository.world_count(), eq(0));
}

#[test]
fn given_seed_file_when_load_then_worlds_and_vibes_available() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "seed.json", SEED_JSON);

    let repository = load_repository(Some(&dir.path().join("seed.json"))).unwrap();

    assert_that!(repository.world_count(), eq(2));
    assert_that!(repository.vibe_count(), eq(1));
    let vibe = repository.get_world_vibe("office").unwrap();
    assert_that!(vibe.mood, eq("calm"));
}

#[test]
fn given_malformed_seed_when_load_then_seed_data_error_names_file() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "seed.json", "{ not json");

    let result = load_repository(Some(&dir.path().join("seed.json")));

    assert!(matches!(result, Err(ServerError::SeedData { .. })));
    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert_that!(message, contains_substring("seed.json"));
}

#[test]
fn given_world_with_unknown_vibe_when_load_then_rejected() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "seed.json",
        r#"{ "worlds": [ { "id": "office", "name": "Office", "current_vibe_id": "ghost" } ] }"#,
    );

    let result = load_repository(Some(&dir.path().join("seed.json")));

    assert!(matches!(result, Err(ServerError::SeedData { .. })));
}
