//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use lawyerify_providers::retry::RetryConfig;
use lawyerify_providers::{ApiKey, BigHugeClient, BigHugeConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";

/// Start a mock server that simulates the Big Huge Thesaurus API
pub async fn start_thesaurus_mock() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock, without retries.
pub fn client_for(server: &MockServer) -> Arc<BigHugeClient> {
    let config = BigHugeConfig::new(ApiKey::new(API_KEY).expect("valid key"))
        .with_base_url(format!("{}/api/2", server.uri()))
        .with_request_timeout(Duration::from_secs(5))
        .with_retry(RetryConfig::none());
    Arc::new(BigHugeClient::new(config).expect("client builds"))
}

fn entry_path(word: &str) -> String {
    format!("/api/2/{API_KEY}/{word}/json")
}

/// Mount a found entry for `word`
pub async fn mount_entry(server: &MockServer, word: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(entry_path(word)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

/// Mount an entry that answers after `delay`
pub async fn mount_delayed_entry(
    server: &MockServer,
    word: &str,
    body: serde_json::Value,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(entry_path(word)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Mount a bare status response for `word`
pub async fn mount_status(server: &MockServer, word: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(entry_path(word)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Everything not mounted explicitly is "not found"
pub async fn mount_fallback_not_found(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .with_priority(u8::MAX)
        .mount(server)
        .await;
}
