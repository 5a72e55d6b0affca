// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use serde_json::json;
use std::net::SocketAddr;
use upow_client::{SubmissionClient, SubmitConfig, SubmitError};

async fn reject() -> (StatusCode, &'static str) {
    (StatusCode::BAD_REQUEST, r#"{"error":"bad"}"#)
}

async fn echo(headers: HeaderMap, body: String) -> String {
    let auth = headers
        .get("authorization")
        .or_else(|| headers.get("x-api-key"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none")
        .to_string();
    format!("{}|{}|{}", auth, content_type, body)
}

/// Serves the mock endpoint on its own runtime thread and returns its address.
fn spawn_server() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let app = Router::new()
                .route("/reject", post(reject))
                .route("/echo", post(echo));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

#[test]
fn test_error_body_is_surfaced() {
    let addr = spawn_server();
    let client = SubmissionClient::new(SubmitConfig::new(format!("http://{}/reject", addr))).unwrap();

    let err = client.submit(&json!({"run_id": "x"})).unwrap_err();
    match err {
        SubmitError::Http { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, r#"{"error":"bad"}"#);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_bearer_auth_and_json_body() {
    let addr = spawn_server();
    let config = SubmitConfig::new(format!("http://{}/echo", addr)).with_api_key("secret");
    let client = SubmissionClient::new(config).unwrap();

    let body = client.submit(&json!({"a": 1})).unwrap();
    assert_eq!(body, r#"Bearer secret|application/json|{"a":1}"#);
}

#[test]
fn test_custom_header_with_bare_key() {
    let addr = spawn_server();
    let config = SubmitConfig::new(format!("http://{}/echo", addr))
        .with_api_key("k123")
        .with_auth("X-Api-Key", "");
    let client = SubmissionClient::new(config).unwrap();

    let body = client.submit(&json!([1, 2])).unwrap();
    assert_eq!(body, "k123|application/json|[1,2]");
}

#[test]
fn test_no_key_sends_no_auth() {
    let addr = spawn_server();
    let client = SubmissionClient::new(SubmitConfig::new(format!("http://{}/echo", addr))).unwrap();
    let body = client.submit(&json!({})).unwrap();
    assert_eq!(body, "none|application/json|{}");
}

#[test]
fn test_invalid_config() {
    assert!(matches!(
        SubmissionClient::new(SubmitConfig::default()),
        Err(SubmitError::InvalidConfig(_))
    ));
    let bad_header = SubmitConfig::new("http://localhost/x")
        .with_api_key("k")
        .with_auth("bad header", "");
    assert!(matches!(
        SubmissionClient::new(bad_header),
        Err(SubmitError::InvalidConfig(_))
    ));
}

#[test]
fn test_unreachable_endpoint_is_transport_error() {
    // Port 9 on loopback is the discard service and is normally closed.
    let client = SubmissionClient::new(SubmitConfig::new("http://127.0.0.1:9/submit")).unwrap();
    assert!(matches!(
        client.submit(&json!({})),
        Err(SubmitError::Transport(_))
    ));
}
