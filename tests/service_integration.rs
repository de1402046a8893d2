//! End-to-end tests for the HTTP search service.
//!
//! Each test writes a catalog to a temp directory, starts a server on an
//! auto-assigned port, and talks to it over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;

use lighthouse::server::HealthResponse;
use lighthouse::{LighthouseConfig, SearchServer};
use lighthouse_search::EnrichedResult;
use serde_json::{Value, json};

const CATALOG: &str = r#"[
    {"name": "alice", "metadata": {"title": "Alice in Wonderland", "author": "Lewis Carroll"}, "cost": 2.5, "available": true},
    {"name": "bob", "metadata": {"title": "Bob the Builder"}, "cost": 1.0, "available": false},
    {"name": "socialengineering", "metadata": {"title": "Social Engineering"}, "cost": 0.0, "available": true},
    {"name": "socialhacks", "metadata": {"title": "Social Engineering Tricks"}, "cost": 0.5, "available": true}
]"#;

async fn start_server(dir: &Path) -> SearchServer {
    let catalog_path = dir.join("catalog.json");
    std::fs::write(&catalog_path, CATALOG).unwrap();

    let mut config = LighthouseConfig::default();
    config.server.port = 0;
    config.catalog.path = Some(catalog_path);

    lighthouse::start(&config).await.unwrap()
}

fn url(server: &SearchServer, path: &str) -> String {
    format!("http://{}{}", server.addr(), path)
}

#[tokio::test]
async fn health_reports_catalog_size() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;

    let response = reqwest::get(url(&server, "/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    let health: HealthResponse = response.json().await.unwrap();
    assert_eq!(
        health,
        HealthResponse {
            status: "ok".into(),
            items: 4
        }
    );
}

#[tokio::test]
async fn search_returns_enriched_results() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;

    let response = reqwest::Client::new()
        .post(url(&server, "/search"))
        .json(&json!({"query": "alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let results: Vec<EnrichedResult> = response.json().await.unwrap();
    assert_eq!(results[0].name, "alice");
    assert!(results.iter().all(|r| r.name != "bob"));
    assert_eq!(results[0].value["title"], "Alice in Wonderland");
    assert_eq!(results[0].value["author"], "Lewis Carroll");
    assert!((results[0].cost - 2.5).abs() < f64::EPSILON);
    assert!(results[0].available);
}

#[tokio::test]
async fn search_honours_field_selection() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;
    let client = reqwest::Client::new();

    let by_author: Vec<EnrichedResult> = client
        .post(url(&server, "/search"))
        .json(&json!({"query": "carroll", "settings": {"search_by": ["author"]}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].name, "alice");

    let by_name: Vec<EnrichedResult> = client
        .post(url(&server, "/search"))
        .json(&json!({"query": "carroll", "settings": {"search_by": ["name"], "force": true}}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(by_name.is_empty());
}

#[tokio::test]
async fn blocked_names_never_returned() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;

    let results: Vec<EnrichedResult> = reqwest::Client::new()
        .post(url(&server, "/search"))
        .json(&json!({"query": "social engineering"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(results.iter().all(|r| r.name != "socialengineering"));
    assert!(results.iter().any(|r| r.name == "socialhacks"));
}

#[tokio::test]
async fn unknown_field_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;

    let response = reqwest::Client::new()
        .post(url(&server, "/search"))
        .json(&json!({"query": "alice", "settings": {"search_by": ["genre"]}}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "config_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("genre"));
}

#[tokio::test]
async fn malformed_body_is_invalid_request() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;

    let response = reqwest::Client::new()
        .post(url(&server, "/search"))
        .header("content-type", "application/json")
        .body("{\"settings\": {}}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn missing_catalog_file_fails_start() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LighthouseConfig::default();
    config.server.port = 0;
    config.catalog.path = Some(dir.path().join("missing.json"));

    let err = lighthouse::start(&config).await.err().expect("start should fail");
    assert!(matches!(err, lighthouse::LighthouseError::Io(_)));
}

#[tokio::test]
async fn shutdown_stops_serving() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_server(dir.path()).await;
    let health = url(&server, "/health");

    assert!(reqwest::get(&health).await.is_ok());
    server.shutdown();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(reqwest::get(&health).await.is_err());
}
