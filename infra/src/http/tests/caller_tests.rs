//! Unit tests for the resilient caller's retry classification

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use httpmock::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tk_core::errors::NetworkError;
use tk_shared::config::RetryPolicy;

use crate::http::ResilientServiceCaller;

#[derive(Debug, PartialEq, Deserialize)]
struct Pong {
    ok: bool,
}

fn caller(policy: RetryPolicy, timeout: Duration) -> ResilientServiceCaller {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap();
    ResilientServiceCaller::with_rng(client, policy, StdRng::seed_from_u64(17))
}

fn quick_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, 20, 1_000)
}

#[tokio::test]
async fn test_success_decodes_body_and_sends_bearer_headers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/ping")
                .header("Service-Authorization", "Bearer svc-tok")
                .header("Authorization", "Bearer user-tok");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "ok": true }));
        })
        .await;

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let pong: Pong = caller
        .get(&server.url("/ping"), "svc-tok", "user-tok")
        .await
        .unwrap();

    assert_eq!(pong, Pong { ok: true });
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_tokens_send_no_auth_headers() {
    // One-shot raw server capturing the request head.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (head_tx, head_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            head.extend_from_slice(&buf[..n]);
            if n == 0 || head.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        let body = r#"{"ok":true}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = head_tx.send(head);
    });

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let pong: Pong = caller
        .get(&format!("http://{}/ping", addr), "", "")
        .await
        .unwrap();
    assert!(pong.ok);

    let head = String::from_utf8(head_rx.await.unwrap()).unwrap().to_lowercase();
    assert!(!head.contains("authorization:"));
    assert!(!head.contains("service-authorization:"));
}

#[tokio::test]
async fn test_post_marshals_payload_as_json_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/echo")
                .json_body(json!({ "name": "svc-a" }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({ "ok": true }));
        })
        .await;

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let pong: Pong = caller
        .post(&server.url("/echo"), "svc-tok", "", &json!({ "name": "svc-a" }))
        .await
        .unwrap();

    assert!(pong.ok);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_content_type_fails_immediately() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/text");
            then.status(200)
                .header("Content-Type", "text/plain")
                .body("pong");
        })
        .await;

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let result: Result<Pong, _> = caller.get(&server.url("/text"), "", "").await;

    match result {
        Err(NetworkError::UnexpectedContentType { content_type }) => {
            assert!(content_type.starts_with("text/plain"));
        }
        other => panic!("expected content type error, got {:?}", other),
    }
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_client_error_fails_immediately_with_decoded_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing");
            then.status(404)
                .header("Content-Type", "application/json")
                .json_body(json!({ "code": 40400, "message": "no such resource" }));
        })
        .await;

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let result: Result<Pong, _> = caller.get(&server.url("/missing"), "", "").await;

    match result {
        Err(NetworkError::RemoteStatus {
            status,
            code,
            message,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(code, 40400);
            assert_eq!(message, "no such resource");
        }
        other => panic!("expected remote status error, got {:?}", other),
    }
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_server_errors_exhaust_retries_with_last_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/broken");
            then.status(500)
                .header("Content-Type", "application/json")
                .json_body(json!({ "code": 1500, "message": "boom" }));
        })
        .await;

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let started = Instant::now();
    let result: Result<Pong, _> = caller.get(&server.url("/broken"), "", "").await;
    let elapsed = started.elapsed();

    match result {
        Err(NetworkError::RetriesExhausted { code, message }) => {
            assert_eq!(code, 1500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected retries exhausted, got {:?}", other),
    }

    // Three attempts total, so exactly two backoff sleeps: at least
    // 10 + 20 ms with base 20 ms.
    assert_eq!(mock.hits_async().await, 3);
    assert!(elapsed >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_too_many_requests_is_retryable_class() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/busy");
            then.status(429)
                .header("Content-Type", "application/json")
                .json_body(json!({ "code": 42900, "message": "slow down" }));
        })
        .await;

    // One allowed attempt: the retryable class exhausts without sleeping.
    let caller = caller(quick_policy(1), Duration::from_secs(2));
    let result: Result<Pong, _> = caller.get(&server.url("/busy"), "", "").await;

    assert!(matches!(
        result,
        Err(NetworkError::RetriesExhausted { code: 42900, .. })
    ));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_connection_refused_aborts_without_retry() {
    // Bind then drop a listener to get a port with nothing behind it.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let caller = caller(quick_policy(3), Duration::from_secs(2));
    let started = Instant::now();
    let result: Result<Pong, _> = caller
        .get(&format!("http://{}/ping", addr), "", "")
        .await;

    assert!(matches!(result, Err(NetworkError::Connection { .. })));
    // No backoff sleeps on the non-timeout path.
    assert!(started.elapsed() < Duration::from_millis(500));
}

/// Serves `failures` connections that stall past the client timeout, then
/// answers every later connection with a JSON 200. Returns the bound
/// address and a counter of accepted connections.
async fn stall_then_succeed_server(failures: usize) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepted);
    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => break,
            };
            let served = counter.fetch_add(1, Ordering::SeqCst) + 1;
            let stall = served <= failures;

            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }

                if stall {
                    // Hold the connection open past the client timeout.
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    return;
                }

                let body = r#"{"ok":true}"#;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    (addr, accepted)
}

#[tokio::test]
async fn test_timeouts_then_success_sleeps_each_retry() {
    let (addr, accepted) = stall_then_succeed_server(3).await;

    let caller = caller(RetryPolicy::new(3, 100, 10_000), Duration::from_millis(100));
    let started = Instant::now();
    let pong: Pong = caller
        .get(&format!("http://{}/ping", addr), "", "")
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(pong.ok);
    // Three timed-out attempts plus the successful fourth.
    assert_eq!(accepted.load(Ordering::SeqCst), 4);
    // Three timeouts of 100 ms each plus three sleeps bounded below by
    // backoff/2: 50 + 100 + 200 ms.
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed <= Duration::from_secs(3));
}

#[tokio::test]
async fn test_timeouts_exhaust_after_policy_limit() {
    let (addr, accepted) = stall_then_succeed_server(usize::MAX).await;

    let caller = caller(RetryPolicy::new(2, 20, 1_000), Duration::from_millis(100));
    let result: Result<Pong, _> = caller
        .get(&format!("http://{}/ping", addr), "", "")
        .await;

    assert!(matches!(result, Err(NetworkError::Timeout)));
    // The timeout path allows max_retries sleeps: initial attempt plus
    // two retries.
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}
