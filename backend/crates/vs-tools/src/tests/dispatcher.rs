use crate::{RateLimiterFactory, ToolDispatcher, ToolRequest};

use std::sync::Arc;
use std::time::Duration;

use googletest::prelude::*;
use serde_json::json;
use vs_config::RequestLimitConfig;
use vs_core::{ContextLevel, InMemoryRepository, SharingPolicy, Vibe, World};
use vs_stream::{
    BrokerConnectionManager, InProcessBroker, StreamingConfig, StreamingOrchestrator, TokenBucket,
};

fn dispatcher_with(limit: RequestLimitConfig) -> (InProcessBroker, ToolDispatcher) {
    let repository = InMemoryRepository::new();
    repository
        .upsert_vibe(Vibe::new("focus", "Focus", "calm", 0.3))
        .unwrap();
    let mut office = World::new("office", "Office", "owner");
    office.current_vibe_id = Some(String::from("focus"));
    office.sharing = SharingPolicy::public(ContextLevel::Partial);
    repository.upsert_world(office).unwrap();

    let broker = InProcessBroker::new();
    let connection = Arc::new(BrokerConnectionManager::new(
        Arc::new(broker.clone()),
        Duration::from_millis(500),
    ));
    let config = StreamingConfig {
        broker_url_override: Some(String::from("memory://tools")),
        interval_ms: 1000,
        ..StreamingConfig::default()
    };
    let orchestrator = StreamingOrchestrator::new(
        config,
        connection,
        Arc::new(repository),
        Arc::new(TokenBucket::new(100, 10, Duration::from_secs(1))),
    )
    .unwrap();

    (
        broker,
        ToolDispatcher::new(orchestrator, RateLimiterFactory::new(limit)),
    )
}

fn dispatcher() -> (InProcessBroker, ToolDispatcher) {
    dispatcher_with(RequestLimitConfig {
        enabled: false,
        ..RequestLimitConfig::default()
    })
}

#[tokio::test]
async fn given_unknown_method_when_dispatch_then_unknown_method_error() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new("stream.rewind", json!(null)).with_id("r1"))
        .await;

    assert_that!(response.ok, eq(false));
    assert_that!(response.id, some(eq("r1")));
    assert_that!(response.error_code(), some(eq("UNKNOWN_METHOD")));
}

#[tokio::test]
async fn given_start_when_dispatch_twice_then_second_reports_already_started() {
    let (_broker, dispatcher) = dispatcher();

    let first = dispatcher
        .dispatch(ToolRequest::new("stream.start", json!(null)))
        .await;
    let second = dispatcher
        .dispatch(ToolRequest::new("stream.start", json!(null)))
        .await;

    assert_that!(first.result.unwrap()["started"], eq(&json!(true)));
    assert_that!(second.result.unwrap()["started"], eq(&json!(false)));
    dispatcher.orchestrator().shutdown().await;
}

#[tokio::test]
async fn given_active_stream_when_stop_then_status_is_idle() {
    let (_broker, dispatcher) = dispatcher();
    dispatcher
        .dispatch(ToolRequest::new("stream.start", json!(null)))
        .await;

    let response = dispatcher
        .dispatch(ToolRequest::new("stream.stop", json!(null)))
        .await;

    let result = response.result.unwrap();
    assert_that!(result["stopped"], eq(&json!(true)));
    assert_that!(result["status"]["active"], eq(&json!(false)));
    assert_that!(result["status"]["hint"]["state"], eq(&json!("idle")));
}

#[tokio::test]
async fn given_fresh_dispatcher_when_status_then_idle_hint_and_config() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new("stream.status", json!(null)))
        .await;

    let result = response.result.unwrap();
    assert_that!(result["hint"]["color"], eq(&json!("blue")));
    assert_that!(result["config"]["stream_id"], eq(&json!("ies")));
    assert_that!(result["tokens_capacity"], eq(&json!(100)));
}

#[tokio::test]
async fn given_world_request_when_dispatch_then_publishes_to_user_and_public() {
    let (broker, dispatcher) = dispatcher();
    let params = json!({
        "world_id": "office",
        "user_id": "alice",
        "sharing": { "is_public": true, "context_level": "partial" }
    });

    let response = dispatcher
        .dispatch(ToolRequest::new("stream.world", params))
        .await;

    assert_that!(response.ok, eq(true));
    let result = response.result.unwrap();
    assert_that!(result["creator_id"], eq(&json!("alice")));
    assert_that!(
        result["published"],
        eq(&json!([
            "ies.world.moment.office",
            "ies.world.moment.office.user.alice"
        ]))
    );
    assert_that!(broker.published(), len(eq(2)));
}

#[tokio::test]
async fn given_world_request_missing_user_when_dispatch_then_invalid_request() {
    let (broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new(
            "stream.world",
            json!({ "world_id": "office" }),
        ))
        .await;

    assert_that!(response.error_code(), some(eq("INVALID_REQUEST")));
    assert_that!(response.error.unwrap().field, some(eq("params")));
    assert_that!(broker.published(), is_empty());
}

#[tokio::test]
async fn given_unknown_world_when_dispatch_then_not_found() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new(
            "stream.world",
            json!({ "world_id": "nowhere", "user_id": "alice" }),
        ))
        .await;

    assert_that!(response.error_code(), some(eq("NOT_FOUND")));
    assert_that!(
        response.error.unwrap().message,
        contains_substring("failed to generate moment")
    );
}

#[tokio::test]
async fn given_vibe_request_when_dispatch_then_user_subject_published() {
    let (broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new(
            "stream.vibe",
            json!({ "world_id": "office", "user_id": "alice" }),
        ))
        .await;

    assert_that!(response.ok, eq(true));
    assert_eq!(
        broker.published_subjects(),
        vec!["ies.world.vibe.office.user.alice"]
    );
}

#[tokio::test]
async fn given_config_update_when_dispatch_then_new_stream_id_returned() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new(
            "stream.config",
            json!({ "stream_id": "custom" }),
        ))
        .await;

    let result = response.result.unwrap();
    assert_that!(result["changed"], eq(&json!(true)));
    assert_that!(result["config"]["stream_id"], eq(&json!("custom")));
    assert_that!(dispatcher.orchestrator().config().stream_id, eq("custom"));
}

#[tokio::test]
async fn given_config_with_unknown_field_when_dispatch_then_rejected() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new(
            "stream.config",
            json!({ "stream": "custom" }),
        ))
        .await;

    assert_that!(response.error_code(), some(eq("INVALID_REQUEST")));
    assert_that!(dispatcher.orchestrator().config().stream_id, eq("ies"));
}

#[tokio::test]
async fn given_empty_config_params_when_dispatch_then_current_config_unchanged() {
    let (_broker, dispatcher) = dispatcher();

    let response = dispatcher
        .dispatch(ToolRequest::new("stream.config", json!(null)))
        .await;

    let result = response.result.unwrap();
    assert_that!(result["changed"], eq(&json!(false)));
    assert_that!(result["config"]["interval_ms"], eq(&json!(1000)));
}

#[tokio::test]
async fn given_request_limit_when_caller_exceeds_then_rate_limited_per_caller() {
    let (_broker, dispatcher) = dispatcher_with(RequestLimitConfig {
        enabled: true,
        max_requests: 2,
        window_secs: 1,
    });
    let status = || ToolRequest::new("stream.status", json!(null));

    let first = dispatcher.dispatch(status().with_caller("alice")).await;
    let second = dispatcher.dispatch(status().with_caller("alice")).await;
    let third = dispatcher.dispatch(status().with_caller("alice")).await;
    let other = dispatcher.dispatch(status().with_caller("bob")).await;

    assert_that!(first.ok, eq(true));
    assert_that!(second.ok, eq(true));
    assert_that!(third.error_code(), some(eq("RATE_LIMIT_EXCEEDED")));
    assert_that!(other.ok, eq(true));
    assert_that!(
        dispatcher.rate_limiter().map(|limiter| limiter.tracked_callers()),
        some(eq(2))
    );
}

#[tokio::test]
async fn given_parsed_line_when_dispatch_then_id_echoed() {
    let (_broker, dispatcher) = dispatcher();
    let request: ToolRequest =
        serde_json::from_str(r#"{"id":"42","method":"stream.status"}"#).unwrap();

    let response = dispatcher.dispatch(request).await;

    assert_that!(response.ok, eq(true));
    assert_that!(response.id, some(eq("42")));
    let line = serde_json::to_string(&response).unwrap();
    assert_that!(line, contains_substring(r#""id":"42""#));
}
