// Integration tests: HTTP endpoints over a mock counter source.

mod common;

use axum::Router;
use axum_test::TestServer;
use common::MockSource;
use metricsd::engine::{EngineOptions, MetricsEngine};
use metricsd::routes;
use std::sync::Arc;
use std::time::Duration;

fn test_app(source: MockSource) -> Router {
    let engine = MetricsEngine::with_options(
        Arc::new(source),
        EngineOptions {
            warmup: Duration::from_millis(100),
            temperature_ttl: Duration::from_secs(5),
        },
    );
    routes::app(Arc::new(engine))
}

fn test_server(source: MockSource) -> TestServer {
    TestServer::new(test_app(source))
}

#[tokio::test]
async fn test_root_endpoint() {
    let server = test_server(MockSource::new());
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("metricsd: sampled system metrics");
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = test_server(MockSource::new());
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("metricsd"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_cpu_endpoint_returns_cursor() {
    let server = test_server(MockSource::new());
    let response = server.get("/cpu").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["usagePercent"].as_f64(), Some(0.0));
    assert_eq!(json["count"].as_u64(), Some(8));
    assert!(!json["cursor"].as_str().unwrap_or("").is_empty());
}

#[tokio::test]
async fn test_memory_endpoint() {
    let server = test_server(MockSource::new());
    let response = server.get("/memory").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["totalKb"].as_u64(), Some(16_000_000));
    assert_eq!(json["availableKb"].as_u64(), Some(8_000_000));
}

#[tokio::test]
async fn test_processes_endpoint_with_query() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/processes")
        .add_query_param("disable_cpu", "true")
        .add_query_param("limit", "2")
        .add_query_param("sort_by", "pid")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json["processes"].as_array().expect("processes array");
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["pid"].as_i64(), Some(101));
    assert!(!json["cursor"].as_str().unwrap_or("").is_empty());
}

#[tokio::test]
async fn test_processes_negative_limit_is_unbounded() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/processes")
        .add_query_param("disable_cpu", "true")
        .add_query_param("limit", "-1")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json["processes"].as_array().expect("processes array");
    assert_eq!(list.len(), 3);

    let response = server
        .get("/processes")
        .add_query_param("disable_cpu", "true")
        .add_query_param("limit", "0")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["processes"].as_array().expect("array").len(), 3);
}

#[tokio::test]
async fn test_meta_negative_limit_is_unbounded() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/meta")
        .add_query_param("modules", "processes")
        .add_query_param("disable_cpu", "true")
        .add_query_param("limit", "-5")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json["processes"]["processes"].as_array().expect("list");
    assert_eq!(list.len(), 3);
}

#[tokio::test]
async fn test_modules_endpoint() {
    let server = test_server(MockSource::new());
    let response = server.get("/modules").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let available = json["available"].as_array().expect("available array");
    assert_eq!(available.len(), 10);
    assert!(available.iter().any(|m| m == "netrate"));
}

#[tokio::test]
async fn test_meta_unknown_module_is_bad_request() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/meta")
        .add_query_param("modules", "cpu,bogus")
        .await;
    response.assert_status_bad_request();
    let json: serde_json::Value = response.json();
    assert!(
        json["error"]
            .as_str()
            .unwrap_or("")
            .contains("unknown module")
    );
}

#[tokio::test]
async fn test_meta_selected_modules_only() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/meta")
        .add_query_param("modules", "memory,system")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.get("memory").is_some());
    assert!(json.get("system").is_some());
    assert!(json.get("cpu").is_none());
    assert!(json.get("processes").is_none());
}

#[tokio::test]
async fn test_meta_all_omits_failed_module() {
    let mut source = MockSource::new();
    source.fail_network = true;
    let server = test_server(source);
    let response = server
        .get("/meta")
        .add_query_param("modules", "all")
        .add_query_param("disable_cpu", "true")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.get("network").is_none());
    assert!(json.get("netrate").is_none());
    assert!(json.get("memory").is_some());
    assert!(json.get("disk").is_some());
    assert!(json.get("hardware").is_some());
}

#[tokio::test]
async fn test_single_domain_failure_is_server_error() {
    let mut source = MockSource::new();
    source.fail_network = true;
    let server = test_server(source);
    let response = server.get("/network").await;
    response.assert_status_internal_server_error();
}

#[tokio::test]
async fn test_network_rate_endpoint_round_trip() {
    let server = test_server(MockSource::new());
    let first = server.get("/network/rate").await;
    first.assert_status_ok();
    let json: serde_json::Value = first.json();
    let cursor = json["cursor"].as_str().expect("cursor").to_string();

    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = server
        .get("/network/rate")
        .add_query_param("cursor", &cursor)
        .await;
    second.assert_status_ok();
    let json: serde_json::Value = second.json();
    let interfaces = json["interfaces"].as_array().expect("interfaces");
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0]["name"].as_str(), Some("eth0"));
    // Counters did not move, so the rate is zero but well-defined.
    assert_eq!(interfaces[0]["rxBytesPerSec"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_disk_mounts_endpoint() {
    let server = test_server(MockSource::new());
    let response = server.get("/disk/mounts").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let mounts = json.as_array().expect("mounts array");
    assert_eq!(mounts[0]["mountPoint"].as_str(), Some("/"));
    assert_eq!(mounts[0]["usagePercent"].as_f64(), Some(40.0));
}

#[tokio::test]
async fn test_all_endpoint() {
    let server = test_server(MockSource::new());
    let response = server
        .get("/all")
        .add_query_param("disable_cpu", "true")
        .add_query_param("limit", "1")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json.get("cpu").is_some());
    assert!(json.get("hardware").is_some());
    let processes = json["processes"]["processes"].as_array().expect("list");
    assert_eq!(processes.len(), 1);
}
