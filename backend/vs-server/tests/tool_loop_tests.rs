mod common;

use common::create_test_dispatcher;

use serde_json::Value;
use vs_server::tool_loop;
use vs_stream::StopSignal;

fn responses(output: &[u8]) -> Vec<Value> {
    String::from_utf8(output.to_vec())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn each_request_line_gets_one_response_line() {
    let (_dir, dispatcher) = create_test_dispatcher();
    let input = concat!(
        r#"{"id":"1","method":"stream.status"}"#,
        "\n",
        r#"{"id":"2","method":"stream.world","params":{"world_id":"office","user_id":"alice"}}"#,
        "\n",
    );
    let mut output = Vec::new();

    let answered = tool_loop::serve(
        &dispatcher,
        input.as_bytes(),
        &mut output,
        StopSignal::new().guard(),
    )
    .await
    .unwrap();

    assert_eq!(answered, 2);
    let responses = responses(&output);
    assert_eq!(responses[0]["id"], "1");
    assert_eq!(responses[0]["result"]["hint"]["state"], "idle");
    assert_eq!(responses[1]["id"], "2");
    assert_eq!(responses[1]["ok"], true);
    assert_eq!(
        responses[1]["result"]["published"][0],
        "ies.world.moment.office.user.alice"
    );
}

#[tokio::test]
async fn blank_lines_are_skipped() {
    let (_dir, dispatcher) = create_test_dispatcher();
    let input = "\n   \n{\"method\":\"stream.status\"}\n\n";
    let mut output = Vec::new();

    let answered = tool_loop::serve(
        &dispatcher,
        input.as_bytes(),
        &mut output,
        StopSignal::new().guard(),
    )
    .await
    .unwrap();

    assert_eq!(answered, 1);
}

#[tokio::test]
async fn malformed_line_gets_an_error_response_and_loop_continues() {
    let (_dir, dispatcher) = create_test_dispatcher();
    let input = "this is not json\n{\"id\":\"ok\",\"method\":\"stream.status\"}\n";
    let mut output = Vec::new();

    let answered = tool_loop::serve(
        &dispatcher,
        input.as_bytes(),
        &mut output,
        StopSignal::new().guard(),
    )
    .await
    .unwrap();

    assert_eq!(answered, 2);
    let responses = responses(&output);
    assert_eq!(responses[0]["ok"], false);
    assert_eq!(responses[0]["error"]["code"], "INVALID_REQUEST");
    assert_eq!(responses[1]["id"], "ok");
}

#[tokio::test]
async fn triggered_stop_ends_the_loop_without_reading() {
    let (_dir, dispatcher) = create_test_dispatcher();
    let stop = StopSignal::new();
    let guard = stop.guard();
    stop.trigger();
    let (_client, server) = tokio::io::duplex(64);
    let mut output = Vec::new();

    let answered = tool_loop::serve(
        &dispatcher,
        tokio::io::BufReader::new(server),
        &mut output,
        guard,
    )
    .await
    .unwrap();

    assert_eq!(answered, 0);
    assert!(output.is_empty());
}

#[tokio::test]
async fn start_then_stop_over_the_loop() {
    let (_dir, dispatcher) = create_test_dispatcher();
    let input = "{\"method\":\"stream.start\"}\n{\"method\":\"stream.stop\"}\n";
    let mut output = Vec::new();

    tool_loop::serve(
        &dispatcher,
        input.as_bytes(),
        &mut output,
        StopSignal::new().guard(),
    )
    .await
    .unwrap();

    let responses = responses(&output);
    assert_eq!(responses[0]["result"]["started"], true);
    assert_eq!(responses[1]["result"]["stopped"], true);
    assert!(!dispatcher.orchestrator().is_active());
}
