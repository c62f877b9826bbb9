//! Request lifecycle tests driven through the mock connector

use starlink_client_grpc::mock;
use starlink_client_grpc::prelude::*;
use starlinkctl::grpc::mock::{MockConnector, MockReply};
use starlinkctl::grpc::{ConnectionError, InvokeError};
use starlinkctl::output::FormatError;
use starlinkctl::{run, Error};
use std::io::{self, Write};
use std::time::Duration;
use tonic::Status;

const SCENARIO_OUTPUT: &str = "\
ID: abc123
HW: rev2
SW: 2024.01
State: CONNECTED
Uptime (s): 3600
Ping latency (ms): 25.50
Ping drop rate: 0.0012
Downlink (bps): 150000000
Uplink (bps): 12000000
Obstructed now: false
Fraction obstructed: 0.0003
";

/// Sink that rejects every write
struct ClosedSink;

impl Write for ClosedSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn status_connector() -> MockConnector {
    MockConnector::new(MockReply::Respond(mock::dish_get_status_response()))
}

#[tokio::test]
async fn test_run_prints_status() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    let args = ["--addr", "192.168.100.1:9200", "--timeout", "3s", "--wait-ready", "true"];
    run(args, &mut out, &connector).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), SCENARIO_OUTPUT);
    assert_eq!(stats.connects(), 1);
    assert_eq!(stats.calls(), 1);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_with_defaults() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    run(Vec::<String>::new(), &mut out, &connector).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), SCENARIO_OUTPUT);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_without_obstruction_stats() {
    let mut status = mock::dish_get_status();
    status.obstruction_stats = None;
    let connector = MockConnector::new(MockReply::Respond(mock::status_response(status)));
    let mut out = Vec::new();

    run(Vec::<String>::new(), &mut out, &connector).await.unwrap();

    let output = String::from_utf8(out).unwrap();
    let expected: Vec<&str> = SCENARIO_OUTPUT.lines().take(9).collect();
    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_run_rejects_unknown_flag() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--verbose"], &mut out, &connector).await.unwrap_err();

    assert!(matches!(error, Error::Arguments { .. }));
    assert_eq!(stats.connects(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_run_rejects_malformed_timeout() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--timeout", "soon"], &mut out, &connector)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Arguments { .. }));
    assert!(error.to_string().starts_with("parse arguments: "));
    assert_eq!(stats.connects(), 0);
    assert_eq!(stats.calls(), 0);
}

#[tokio::test]
async fn test_run_rejects_overflowing_timeout() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--timeout", "500000000000years"], &mut out, &connector)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Arguments { .. }));
    assert_eq!(stats.connects(), 0);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_run_help_is_an_argument_error() {
    let connector = status_connector();
    let mut out = Vec::new();

    let error = run(["--help"], &mut out, &connector).await.unwrap_err();

    let Error::Arguments { source } = error else {
        panic!("expected argument error");
    };
    assert!(source.is_help());
    assert_eq!(connector.stats().connects(), 0);
}

#[tokio::test]
async fn test_run_connection_failure_skips_call() {
    let connector = status_connector();
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--addr", "not an address"], &mut out, &connector)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Connection {
            source: ConnectionError::InvalidAddress { .. }
        }
    ));
    assert!(error.to_string().starts_with("create client: "));
    assert_eq!(stats.calls(), 0);
    assert_eq!(stats.closes(), 0);
}

#[tokio::test]
async fn test_run_timeout_still_closes() {
    let connector = MockConnector::new(MockReply::Hang);
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--timeout", "100ms"], &mut out, &connector)
        .await
        .unwrap_err();

    let Error::Invoke { source } = &error else {
        panic!("expected invoke error, got {error}");
    };
    assert!(source.is_timeout());
    assert!(error.to_string().starts_with("handle(get_status): "));
    assert_eq!(stats.calls(), 1);
    assert_eq!(stats.closes(), 1);
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_run_not_ready_without_wait_fails() {
    let connector = status_connector().not_ready_for(Duration::from_secs(10));
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(["--wait-ready=false", "--timeout", "1s"], &mut out, &connector)
        .await
        .unwrap_err();

    let Error::Invoke { source } = error else {
        panic!("expected invoke error");
    };
    assert!(matches!(source, InvokeError::Rpc { .. }));
    assert!(!source.is_timeout());
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_waits_for_ready() {
    let connector = status_connector().not_ready_for(Duration::from_millis(50));
    let mut out = Vec::new();

    run(["--timeout", "2s"], &mut out, &connector).await.unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), SCENARIO_OUTPUT);
}

#[tokio::test]
async fn test_run_rpc_failure() {
    let connector = MockConnector::new(MockReply::Fail(Status::unavailable("dish rebooting")));
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(Vec::<String>::new(), &mut out, &connector)
        .await
        .unwrap_err();

    assert!(error.to_string().contains("dish rebooting"));
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_missing_status() {
    let connector = MockConnector::new(MockReply::Respond(device::Response::default()));
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(Vec::<String>::new(), &mut out, &connector)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        Error::Format {
            source: FormatError::MissingStatus
        }
    ));
    assert!(out.is_empty());
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_write_failure() {
    let connector = status_connector();
    let stats = connector.stats();

    let error = run(Vec::<String>::new(), &mut ClosedSink, &connector)
        .await
        .unwrap_err();

    let Error::Format { source } = error else {
        panic!("expected format error");
    };
    let FormatError::Write { field, .. } = source else {
        panic!("expected write error");
    };
    assert_eq!(field, "ID");
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_close_failure_keeps_success() {
    let connector = status_connector().failing_close("socket already gone");
    let stats = connector.stats();
    let mut out = Vec::new();

    let result = run(Vec::<String>::new(), &mut out, &connector).await;

    assert!(result.is_ok());
    assert_eq!(String::from_utf8(out).unwrap(), SCENARIO_OUTPUT);
    assert_eq!(stats.closes(), 1);
}

#[tokio::test]
async fn test_run_close_failure_keeps_primary_error() {
    let connector = MockConnector::new(MockReply::Respond(device::Response::default()))
        .failing_close("socket already gone");
    let stats = connector.stats();
    let mut out = Vec::new();

    let error = run(Vec::<String>::new(), &mut out, &connector)
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Format { .. }));
    assert_eq!(stats.closes(), 1);
}
