use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};
use serial_test::serial;

// =========================================================================
// Validation Tests - Publish and Request Limits
// =========================================================================

#[test]
#[serial]
fn given_zero_capacity_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _capacity = EnvGuard::set("VS_PUBLISH_LIMIT_CAPACITY", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_zero_refill_rate_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _rate = EnvGuard::set("VS_PUBLISH_LIMIT_REFILL_RATE", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_request_limit_below_one_per_second_when_validate_then_error() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _max = EnvGuard::set("VS_REQUEST_LIMIT_MAX_REQUESTS", "10");
    let _window = EnvGuard::set("VS_REQUEST_LIMIT_WINDOW_SECS", "60");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_disabled_request_limit_when_values_invalid_then_ok() {
    // Given
    let (_temp, _guard) = setup_config_dir();
    let _enabled = EnvGuard::set("VS_REQUEST_LIMIT_ENABLED", "false");
    let _max = EnvGuard::set("VS_REQUEST_LIMIT_MAX_REQUESTS", "0");

    // When
    let result = Config::load().unwrap().validate();

    // Then
    assert_that!(result, ok(anything()));
}
