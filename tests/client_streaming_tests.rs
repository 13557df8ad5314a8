//! # Client Streaming Tests
//!
//! Tests the client-side delta-stream consumer against a wiremock endpoint
//! speaking the OpenRouter SSE convention.

use futures_util::StreamExt;
use lingua_proxy::{ClientConfig, ClientError, StreamFrame, StreamingClient};
use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{header as header_eq, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn client_for(mock_server: &MockServer) -> StreamingClient {
    StreamingClient::with_client(
        reqwest::Client::new(),
        ClientConfig {
            endpoint: format!("{}/api/v1/chat/completions", mock_server.uri()),
            connect_timeout: Duration::from_secs(2),
            read_timeout: Duration::from_secs(5),
        },
    )
}

fn chat_body() -> serde_json::Value {
    json!({
        "model": "meta-llama/llama-3-8b-instruct",
        "messages": [{"role": "user", "content": "Say hello in French"}],
        "stream": true
    })
}

/// One `data:` line carrying a content delta, in the wire shape the parser
/// consumes.
fn frame_line(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::to_string(&StreamFrame::content(text)).unwrap()
    )
}

async fn mount_sse(mock_server: &MockServer, body: String) {
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_deltas_arrive_in_order_and_complete_on_sentinel() {
    let mock_server = MockServer::start().await;
    mount_sse(
        &mock_server,
        format!("{}{}data: [DONE]\n\n", frame_line("Bon"), frame_line("jour")),
    )
    .await;

    let client = client_for(&mock_server);
    let deltas: Vec<String> = client
        .stream_chat(&chat_body(), Default::default())
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["Bon", "jour"]);
}

#[tokio::test]
async fn test_malformed_frame_is_skipped_not_fatal() {
    let mock_server = MockServer::start().await;
    mount_sse(
        &mock_server,
        format!(
            "data: {{not valid json}}\n\n{}data: [DONE]\n\n",
            frame_line("ok")
        ),
    )
    .await;

    let client = client_for(&mock_server);
    let deltas: Vec<String> = client
        .stream_chat(&chat_body(), Default::default())
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["ok"]);
}

#[tokio::test]
async fn test_frames_without_content_yield_nothing() {
    let mock_server = MockServer::start().await;
    // Role-only first frame and keep-alive comments are normal; neither is
    // a delta and neither is an error.
    mount_sse(
        &mock_server,
        format!(
            "{}{}{}data: [DONE]\n\n",
            ": keep-alive\n\n",
            "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
            frame_line("salut"),
        ),
    )
    .await;

    let client = client_for(&mock_server);
    let deltas: Vec<String> = client
        .stream_chat(&chat_body(), Default::default())
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["salut"]);
}

#[tokio::test]
async fn test_non_success_status_is_typed_transport_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .stream_chat(&chat_body(), Default::default())
        .await
        .err()
        .expect("non-2xx must fail before any delta");

    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid token");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_caller_headers_are_passed_through() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header_eq("authorization", "Bearer sk-or-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: [DONE]\n\n", "text/event-stream"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        "Bearer sk-or-test".parse().unwrap(),
    );

    let client = client_for(&mock_server);
    let deltas: Vec<_> = client
        .stream_chat(&chat_body(), headers)
        .await
        .unwrap()
        .collect()
        .await;
    assert!(deltas.is_empty());
}

#[tokio::test]
async fn test_stream_without_sentinel_completes_on_closure() {
    let mock_server = MockServer::start().await;
    mount_sse(&mock_server, frame_line("fin")).await;

    let client = client_for(&mock_server);
    let deltas: Vec<String> = client
        .stream_chat(&chat_body(), Default::default())
        .await
        .unwrap()
        .map(|d| d.unwrap())
        .collect()
        .await;

    assert_eq!(deltas, vec!["fin"]);
}
