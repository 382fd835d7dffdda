use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Streaming
// =========================================================================

#[test]
#[serial]
fn given_stream_id_with_dot_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _stream = EnvGuard::set("VS_STREAM_ID", "tenant.a");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_stream_id_with_wildcard_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _stream = EnvGuard::set("VS_STREAM_ID", "tenant>");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_empty_stream_id_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _stream = EnvGuard::set("VS_STREAM_ID", "");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_interval_below_min_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _interval = EnvGuard::set("VS_STREAM_INTERVAL_MS", "10");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_autostart_env_when_load_then_enabled() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _autostart = EnvGuard::set("VS_STREAM_AUTOSTART", "1");

    // When
    let config = Config::load().unwrap();

    // Then
    assert!(config.streaming.autostart);
    assert_that!(config.validate(), ok(anything()));
}
