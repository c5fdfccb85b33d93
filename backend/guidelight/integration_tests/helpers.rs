//! Shared fixtures for client integration tests.

use guidelight::{Client, ClientConfig, ClientOptions};

use std::collections::HashMap;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "id";
pub const CLIENT_SECRET: &str = "secret";
pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";

/// Options pointing at `server` with a valid API key.
pub fn options_for(server: &MockServer) -> ClientOptions {
    ClientOptions::new()
        .url(server.uri())
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET)
        .timeout(Duration::from_secs(5))
}

pub fn client_with(options: ClientOptions) -> Client {
    let config = ClientConfig::resolve(options, &HashMap::new()).expect("valid test config");
    Client::new(config).expect("client should build")
}

pub fn client_for(server: &MockServer) -> Client {
    client_with(options_for(server))
}

/// Mounts `/v1/authenticate` expecting the test API key and answering with
/// the standard token pair. `calls` is verified when the server drops.
pub async fn mount_authenticate(server: &MockServer, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/authenticate"))
        .and(body_json(json!({
            "client_id": CLIENT_ID,
            "client_secret": CLIENT_SECRET,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "refresh_token": REFRESH_TOKEN,
        })))
        .expect(calls)
        .mount(server)
        .await;
}

/// Number of requests the server has seen.
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}
