//! Fetch client integration tests against local mock origins.

use std::time::Duration;

use proxy_harness::net::fetch::{fetch_via_proxy, http_exchange};

mod common;

#[tokio::test]
async fn exchange_returns_the_full_response_text() {
    let addr = common::start_mock_origin("hello from origin", Duration::ZERO).await;

    let response = http_exchange(
        "127.0.0.1",
        addr.port(),
        "http://anything.example/",
        Duration::from_secs(5),
    )
    .await
    .expect("mock origin should answer");

    // Headers and body come back as one opaque string.
    assert!(response.starts_with("HTTP/1.0 200 OK"));
    assert!(response.ends_with("hello from origin"));
}

#[tokio::test]
async fn refused_connection_is_a_missing_result() {
    let port = common::unused_port().await;

    let response = http_exchange("127.0.0.1", port, "/", Duration::from_secs(5)).await;
    assert!(response.is_none());
}

#[tokio::test]
async fn via_proxy_sends_the_absolute_url_to_localhost() {
    let addr = common::start_mock_origin("proxied body", Duration::ZERO).await;

    let response = fetch_via_proxy(addr.port(), "http://www.mit.edu/", Duration::from_secs(5))
        .await
        .expect("mock proxy should answer");

    assert!(response.contains("proxied body"));
}
