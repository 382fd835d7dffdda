use crate::nats_transport::{ServerOp, parse_op, server_address};

use googletest::assert_that;
use googletest::prelude::eq;

#[test]
fn given_url_without_port_when_resolved_then_default_port_added() {
    assert_that!(server_address("nats://broker").unwrap(), eq("broker:4222"));
}

#[test]
fn given_url_with_port_and_slash_when_resolved_then_port_kept() {
    assert_that!(
        server_address("nats://10.0.0.5:4333/").unwrap(),
        eq("10.0.0.5:4333")
    );
}

#[test]
fn given_ipv6_without_port_when_resolved_then_default_port_added() {
    assert_that!(server_address("nats://[::1]").unwrap(), eq("[::1]:4222"));
}

#[test]
fn given_other_scheme_or_empty_host_when_resolved_then_error() {
    assert!(server_address("memory://local").is_err());
    assert!(server_address("nats://").is_err());
    assert!(server_address("nats://host/path").is_err());
}

#[test]
fn given_control_lines_when_parsed_then_ops_recognised() {
    assert_eq!(parse_op("PING"), ServerOp::Ping);
    assert_eq!(parse_op("pong"), ServerOp::Pong);
    assert_eq!(parse_op("+OK"), ServerOp::Ok);
    assert_eq!(parse_op("INFO {}"), ServerOp::Info);
    assert_eq!(
        parse_op("-ERR 'Authorization Violation'"),
        ServerOp::Err(String::from("Authorization Violation"))
    );
    assert_eq!(
        parse_op("MSG a.b 1 0"),
        ServerOp::Other(String::from("MSG a.b 1 0"))
    );
}
