//! Integration tests for the usage client against a local mock server.

use std::time::Duration;

use leeway_fetch::{FetchError, UsageClient, UsageFetcher};
use tokio_util::sync::CancellationToken;

const USAGE_PATH: &str = "/api/oauth/usage";

fn open_client(url: &str) -> UsageClient {
    let client = UsageClient::with_base_url(url);
    client.open().unwrap();
    client
}

#[tokio::test]
async fn test_fetch_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", USAGE_PATH)
        .match_header("authorization", "Bearer sk-ant-oat01-test")
        .match_header("anthropic-beta", "oauth-2025-04-20")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "five_hour": {"utilization_pct": 45.0, "resets_at": "2026-02-20T20:00:00Z"},
                "seven_day": {"utilization": 62.0, "resets_at": "2026-02-23T00:00:00Z"},
                "seven_day_opus": null
            }"#,
        )
        .create_async()
        .await;

    let client = open_client(&server.url());
    let data = client
        .fetch("sk-ant-oat01-test", &CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(data.session_pct(), Some(45.0));
    assert_eq!(data.weekly_pct(), Some(62.0));
    assert_eq!(data.opus_pct(), None);
}

#[tokio::test]
async fn test_fetch_status_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", USAGE_PATH)
        .with_status(429)
        .create_async()
        .await;

    let client = open_client(&server.url());
    let err = client
        .fetch("token", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Status { code: 429, .. }));
    assert_eq!(err.to_string(), "API returned 429: Too Many Requests");
}

#[tokio::test]
async fn test_fetch_unparseable_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", USAGE_PATH)
        .with_status(200)
        .with_body("\"just a string\"")
        .create_async()
        .await;

    let client = open_client(&server.url());
    let err = client
        .fetch("token", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
    assert!(err.to_string().contains("parse"));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = open_client(&format!("http://{addr}"));
    let err = client
        .fetch("token", &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http(_)));
    assert!(err.to_string().starts_with("HTTP request failed"));
}

#[tokio::test]
async fn test_fetch_cancelled_mid_request() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let client = open_client(&format!("http://{addr}"));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(Duration::from_secs(5), client.fetch("token", &cancel))
        .await
        .expect("fetch should return promptly after cancellation");

    assert!(matches!(result, Err(FetchError::Cancelled)));
}
