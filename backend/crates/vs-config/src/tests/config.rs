use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir, write_config};

use googletest::assert_that;
use googletest::prelude::{anything, eq, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.broker.port, eq(crate::DEFAULT_BROKER_PORT));
    assert_that!(config.streaming.stream_id, eq("ies"));
    assert_that!(config.streaming.autostart, eq(false));
    assert_that!(config.publish_limit.capacity, eq(100));
    assert_that!(config.publish_limit.refill_rate, eq(10));
}

#[test]
#[serial]
fn given_no_config_file_when_load_and_validate_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}

#[test]
#[serial]
fn given_defaults_when_broker_url_then_derived_from_host_and_port() {
    // Given
    let (_temp, _guard) = setup_config_dir();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.broker.broker_url(), eq("nats://127.0.0.1:4222"));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        &temp,
        r#"
            [broker]
            host = "broker.internal"
            port = 4333

            [streaming]
            stream_id = "tenant-a"
            interval_ms = 250
            autostart = true
        "#,
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.broker.broker_url(), eq("nats://broker.internal:4333"));
    assert_that!(config.streaming.stream_id, eq("tenant-a"));
    assert_that!(config.streaming.interval_ms, eq(250));
    assert_that!(config.streaming.autostart, eq(true));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_env_var_and_toml_when_load_then_env_var_overrides_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(&temp, "[streaming]\nstream_id = \"from-toml\"");
    let _stream = EnvGuard::set("VS_STREAM_ID", "from-env");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.streaming.stream_id, eq("from-env"));
}

#[test]
#[serial]
fn given_explicit_url_when_load_then_url_overrides_host_and_port() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _host = EnvGuard::set("VS_BROKER_HOST", "ignored");
    let _url = EnvGuard::set("VS_BROKER_URL", "memory://local");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(config.broker.broker_url(), eq("memory://local"));
    assert_that!(config.validate(), ok(anything()));
}

#[test]
#[serial]
fn given_seed_and_log_file_when_paths_resolved_then_relative_to_config_dir() {
    // Given
    let (temp, _guard) = setup_config_dir();
    write_config(
        &temp,
        "[seed]\npath = \"worlds.json\"\n\n[logging]\nfile = \"vibestream.log\"",
    );

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.seed_path(temp.path()),
        eq(&Some(temp.path().join("worlds.json")))
    );
    assert_that!(
        config.log_file_path(temp.path()),
        eq(&Some(temp.path().join("log").join("vibestream.log")))
    );
}
