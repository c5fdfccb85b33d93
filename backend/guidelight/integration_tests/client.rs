// Integration tests for the client against a mock Endeavor server
// Covers the authentication lifecycle, request composition and status mapping

use crate::helpers::{
    ACCESS_TOKEN, REFRESH_TOKEN, client_for, client_with, mount_authenticate, options_for,
    request_count,
};

use guidelight::client::USER_AGENT_VALUE;
use guidelight::{ClientOptions, Credentials, EndeavorError, Payload, QueryParams, RequestOptions};

use std::collections::HashMap;
use std::net::TcpListener;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_SEGMENTS: [&str; 0] = [];

// ============================================
// AUTHENTICATION LIFECYCLE
// ============================================

/// **VALUE**: The first authenticated request exchanges the API key and
/// attaches the bearer token.
///
/// **BUG THIS CATCHES**: Would catch the pre-flight being skipped, or the
/// token being attached to the exchange request itself.
#[tokio::test]
async fn given_api_key_when_first_request_sent_then_authenticates_and_uses_bearer() {
    // GIVEN: A server that issues tokens and requires them on /v1/authrequired
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/authrequired"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Posting to an absolute endpoint path
    let payload = client
        .post(&json!({}), &["/v1/authrequired"], None)
        .await
        .expect("request should succeed");

    // THEN: The response is decoded and the client holds credentials
    assert_eq!(payload, Payload::Json(json!([])));
    let creds = client.credentials().await.expect("credentials stored");
    assert_eq!(creds.access_token().map(|t| t.expose()), Some(ACCESS_TOKEN));
    assert_eq!(creds.refresh_token().map(|t| t.expose()), Some(REFRESH_TOKEN));
    assert!(client.is_refreshable().await);
}

#[tokio::test]
async fn given_stored_credentials_when_second_request_sent_then_no_new_exchange() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents"))
        .and(header("authorization", "Bearer access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .expect(2)
        .mount(&server)
        .await;
    let client = client_for(&server);

    client.get(&["agents"], None).await.expect("first request");
    client.get(&["agents"], None).await.expect("second request");
}

/// **VALUE**: A refresh token is exchanged instead of the API key.
///
/// **BUG THIS CATCHES**: Would catch the client falling back to
/// `/v1/authenticate` when only a refresh token is held, or reusing the old
/// token after the refresh.
#[tokio::test]
async fn given_refresh_only_credentials_when_request_sent_then_reauthenticates_once() {
    // GIVEN: A client holding only a refresh token
    let server = MockServer::start().await;
    mount_authenticate(&server, 0).await;
    Mock::given(method("POST"))
        .and(path("/v1/reauthenticate"))
        .and(body_json(json!({"refresh_token": "saved-refresh"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-access",
            "refresh_token": "fresh-refresh",
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/projects"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    let client = client_for(&server);
    client
        .set_credentials(Credentials::refresh_only("saved-refresh"))
        .await;

    // WHEN: Making two authenticated requests
    let first = client.get(&["projects"], None).await.expect("first request");
    let second = client.get(&["projects"], None).await.expect("second request");

    // THEN: The new credentials replaced the old ones
    assert!(first.is_empty());
    assert!(second.is_empty());
    let creds = client.credentials().await.expect("credentials stored");
    assert_eq!(creds.access_token().map(|t| t.expose()), Some("fresh-access"));
    assert_eq!(creds.refresh_token().map(|t| t.expose()), Some("fresh-refresh"));
}

/// **VALUE**: Missing API keys fail locally.
///
/// **BUG THIS CATCHES**: Would catch the client posting an empty API key to
/// the server and reporting the server's rejection instead.
#[tokio::test]
async fn given_no_api_key_when_authenticated_request_sent_then_fails_without_io() {
    let server = MockServer::start().await;
    let client = client_with(ClientOptions::new().url(server.uri()));

    let err = client.get(&["agents"], None).await.unwrap_err();

    assert!(matches!(err, EndeavorError::Authentication { status: None, .. }));
    assert_eq!(err.message(), "no client id or secret specified");
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn given_exchange_without_access_token_when_authenticating_then_slot_unchanged() {
    // GIVEN: A server whose token response lacks access_token
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/authenticate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"refresh_token": "r"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    // WHEN: Authenticating explicitly
    let err = client.authenticate().await.unwrap_err();

    // THEN: The error names the problem and nothing was stored
    assert!(matches!(err, EndeavorError::Authentication { .. }));
    assert_eq!(
        err.message(),
        "authentication response did not include an access token"
    );
    assert!(client.credentials().await.is_none());
}

#[tokio::test]
async fn given_rejected_api_key_when_authenticating_then_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/authenticate"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.authenticate().await.unwrap_err();

    assert!(matches!(err, EndeavorError::Authentication { .. }));
    assert_eq!(err.status_code(), Some(403));
    assert!(!client.is_authenticated().await);
}

/// **VALUE**: A 401 on an authenticated call is reported, not retried.
///
/// **BUG THIS CATCHES**: Would catch a hidden re-authentication loop that
/// hammers `/v1/authenticate` whenever a token is revoked.
#[tokio::test]
async fn given_valid_token_when_server_returns_401_then_error_surfaces_immediately() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.get(&["agents"], None).await.unwrap_err();

    assert!(matches!(err, EndeavorError::Authentication { .. }));
    assert_eq!(err.message(), "authentication failed");
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn given_cloned_client_when_one_authenticates_then_clone_shares_credentials() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    let client = client_for(&server);
    let clone = client.clone();

    client.authenticate().await.expect("authenticates");

    assert!(clone.is_authenticated().await);
    clone.authenticate().await.expect("reuses stored credentials");
}

#[tokio::test]
async fn given_credentials_when_cleared_then_next_request_authenticates_again() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 2).await;
    let client = client_for(&server);

    client.authenticate().await.expect("first exchange");
    client.clear_credentials().await;
    assert!(!client.is_authenticated().await);

    client.authenticate().await.expect("second exchange");
    assert!(client.is_authenticated().await);
}

#[tokio::test]
async fn given_concurrent_requests_when_unauthenticated_then_single_exchange() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(204))
        .expect(4)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let (a, b, c, d) = tokio::join!(
        client.get(&["agents"], None),
        client.get(&["agents"], None),
        client.get(&["agents"], None),
        client.get(&["agents"], None),
    );

    for result in [a, b, c, d] {
        result.expect("request should succeed");
    }
}

// ============================================
// REQUEST COMPOSITION
// ============================================

#[tokio::test]
async fn given_any_request_when_sent_then_default_headers_are_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .and(header("accept", "application/json"))
        .and(header("accept-language", "en-US,en"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .and(header("user-agent", USER_AGENT_VALUE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let payload = client
        .get_with(&["status"], None, RequestOptions::unauthenticated())
        .await
        .expect("headers should match");

    assert_eq!(payload.as_json(), Some(&json!({"ok": true})));
    assert!(USER_AGENT_VALUE.starts_with("guidelight/"));
    assert!(USER_AGENT_VALUE.contains(" rust/"));
}

#[tokio::test]
async fn given_unauthenticated_request_when_sent_then_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/public"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let client = client_for(&server);

    client
        .get_with(&["public"], None, RequestOptions::unauthenticated())
        .await
        .expect("request should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert!(!client.is_authenticated().await);
}

#[tokio::test]
async fn given_query_when_request_sent_then_parameters_are_encoded() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/projects/42/agents"))
        .and(query_param("ordering", "-created"))
        .and(query_param("search", "red team"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);
    let query = QueryParams::from([("ordering", "-created"), ("search", "red team")]);

    client
        .get(&["projects", "42", "agents"], Some(&query))
        .await
        .expect("query should match");
}

#[tokio::test]
async fn given_typed_body_when_put_then_json_is_sent() {
    #[derive(serde::Serialize)]
    struct Rename<'a> {
        name: &'a str,
    }

    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("PUT"))
        .and(path("/v1/projects/7"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let payload = client
        .put(&Rename { name: "renamed" }, &["projects", "7"], None)
        .await
        .expect("put should succeed");

    assert_eq!(payload, Payload::Empty);
}

/// **VALUE**: Bodies that cannot become JSON fail before any I/O.
///
/// **BUG THIS CATCHES**: Would catch serialization happening after the
/// authentication exchange, wasting a round trip on a doomed request.
#[tokio::test]
async fn given_unserializable_body_when_post_then_validation_error_without_io() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let mut body: HashMap<(u8, u8), u8> = HashMap::new();
    body.insert((1, 2), 3);

    let err = client.post(&body, &["things"], None).await.unwrap_err();

    assert!(matches!(err, EndeavorError::Validation { .. }));
    assert!(err.is_client_error());
    assert_eq!(request_count(&server).await, 0);
}

// ============================================
// RESPONSE MAPPING
// ============================================

#[tokio::test]
async fn given_json_payload_when_decoded_then_typed_value_is_returned() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Agent {
        id: u32,
        name: String,
    }

    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "scout"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let agent: Agent = client
        .get(&["agents", "1"], None)
        .await
        .expect("request should succeed")
        .into_json()
        .expect("valid agent");

    assert_eq!(
        agent,
        Agent {
            id: 1,
            name: "scout".to_string()
        }
    );
}

#[tokio::test]
async fn given_non_json_response_when_delete_then_raw_bytes_are_returned() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/v1/exports/3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"a,b\n1,2".to_vec(), "text/csv"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let payload = client
        .delete(&["exports", "3"], None)
        .await
        .expect("delete should succeed");

    assert_eq!(payload, Payload::Bytes(b"a,b\n1,2".to_vec()));
}

#[tokio::test]
async fn given_404_with_field_errors_when_request_sent_then_not_found_with_message() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "agent not found",
            "errors": [{"field": "id", "error": "no agent with id 99"}],
        })))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.get(&["agents", "99"], None).await.unwrap_err();

    assert!(matches!(err, EndeavorError::NotFound { .. }));
    assert_eq!(err.message(), "agent not found:\n  id: no agent with id 99");
    assert_eq!(err.fields().len(), 1);
}

#[tokio::test]
async fn given_400_without_body_when_request_sent_then_fallback_message_names_host() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let host = client.host().to_string();

    let err = client.post(&json!({}), &["agents"], None).await.unwrap_err();

    assert!(matches!(err, EndeavorError::Client { .. }));
    assert_eq!(err.message(), format!("400 response from {host}"));
}

#[tokio::test]
async fn given_server_failure_when_request_sent_then_server_error() {
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v1/agents"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({"error": "upstream down"})))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.get(&["agents"], None).await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.message(), "upstream down");
}

// ============================================
// TRANSPORT
// ============================================

/// A loopback URL with nothing listening on it.
fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    format!("http://127.0.0.1:{port}")
}

/// **VALUE**: Connection failures are retried exactly `max_retries` times,
/// then reported as HTTP errors.
///
/// **BUG THIS CATCHES**: Would catch retries being skipped or cut short. The
/// schedule is unjittered (100 ms, 150 ms, 225 ms, 337 ms), so three retries
/// take at least 475 ms and a fourth would push past 800 ms.
#[tokio::test]
async fn given_unreachable_server_when_request_sent_then_retries_then_connection_error() {
    // GIVEN: A port with nothing listening on it
    let client = client_with(
        ClientOptions::new()
            .url(refused_url())
            .timeout(Duration::from_secs(2))
            .max_retries(3),
    );

    // WHEN: Sending a request
    let started = Instant::now();
    let err = client
        .get_with(&NO_SEGMENTS, None, RequestOptions::unauthenticated())
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    // THEN: Exactly three backoff delays elapsed before the error surfaced
    assert!(matches!(
        err,
        EndeavorError::Http {
            is_connection: true,
            ..
        }
    ));
    assert!(elapsed >= Duration::from_millis(475), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(800), "elapsed {elapsed:?}");
    assert!(!err.is_api_error());
}

#[tokio::test]
async fn given_no_retries_when_connection_refused_then_fails_without_delay() {
    let client = client_with(
        ClientOptions::new()
            .url(refused_url())
            .timeout(Duration::from_secs(2))
            .max_retries(0),
    );

    let started = Instant::now();
    let err = client
        .get_with(&NO_SEGMENTS, None, RequestOptions::unauthenticated())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EndeavorError::Http {
            is_connection: true,
            ..
        }
    ));
    assert!(started.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn given_client_when_endpoint_built_then_versioned_path_is_used() {
    let server = MockServer::start().await;
    let client = client_with(options_for(&server));

    let endpoint = client.endpoint(&["agents", "5"], None);

    assert_eq!(endpoint.to_string(), format!("{}/v1/agents/5", server.uri()));
    assert_eq!(client.scheme(), "http");
    assert!(client.is_localhost());
}
