// Integration tests for the connect entry point and .env loading
// These mutate the process environment, so they run serially

use crate::helpers::{CLIENT_ID, CLIENT_SECRET, mount_authenticate};

use guidelight::config::{
    ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_URL, load_env_file_from, process_env,
};
use guidelight::{ClientOptions, GuidelightError, connect};

use std::fs;

use serial_test::serial;
use tempfile::TempDir;
use wiremock::MockServer;

fn clear_endeavor_env() {
    // SAFETY: tests touching the environment are #[serial]
    unsafe {
        std::env::remove_var(ENV_URL);
        std::env::remove_var(ENV_CLIENT_ID);
        std::env::remove_var(ENV_CLIENT_SECRET);
    }
}

/// **VALUE**: `connect` returns a client that is already authenticated.
///
/// **BUG THIS CATCHES**: Would catch the pre-flight being dropped, which would
/// defer bad-credential errors to the first real request.
#[tokio::test]
#[serial]
async fn given_complete_options_when_connect_then_client_is_authenticated() {
    // GIVEN: A server that accepts the API key
    clear_endeavor_env();
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    let options = ClientOptions::new()
        .url(server.uri())
        .client_id(CLIENT_ID)
        .client_secret(CLIENT_SECRET);

    // WHEN: Connecting
    let client = connect(options).await.expect("connect should succeed");

    // THEN: Credentials were obtained eagerly
    assert!(client.is_authenticated().await);
}

#[tokio::test]
#[serial]
async fn given_credentials_in_environment_when_connect_then_environment_fills_gaps() {
    clear_endeavor_env();
    let server = MockServer::start().await;
    mount_authenticate(&server, 1).await;
    // SAFETY: serialised with every other environment test
    unsafe {
        std::env::set_var(ENV_CLIENT_ID, CLIENT_ID);
        std::env::set_var(ENV_CLIENT_SECRET, CLIENT_SECRET);
    }

    let result = connect(ClientOptions::new().url(server.uri())).await;
    clear_endeavor_env();

    let client = result.expect("connect should succeed");
    assert_eq!(client.config().client_id.as_deref(), Some(CLIENT_ID));
}

#[tokio::test]
#[serial]
async fn given_no_api_key_when_connect_then_authentication_error() {
    clear_endeavor_env();
    let server = MockServer::start().await;

    let err = connect(ClientOptions::new().url(server.uri()))
        .await
        .unwrap_err();

    assert!(err.is_authentication());
}

#[tokio::test]
#[serial]
async fn given_rejected_key_when_connect_then_endeavor_error_is_returned() {
    clear_endeavor_env();
    let server = MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::path("/v1/authenticate"))
        .respond_with(wiremock::ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let options = ClientOptions::new()
        .url(server.uri())
        .client_id("wrong")
        .client_secret("wrong");

    let err = connect(options).await.unwrap_err();

    assert!(matches!(err, GuidelightError::Endeavor(_)));
    assert!(err.is_authentication());
}

/// **VALUE**: `.env` values reach the process environment without
/// overriding variables that are already set.
#[test]
#[serial]
fn given_env_file_when_loaded_then_unset_variables_are_filled() {
    // GIVEN: A .env file and one variable already exported
    clear_endeavor_env();
    let dir = TempDir::new().expect("temp dir");
    let env_path = dir.path().join(".env");
    fs::write(
        &env_path,
        "ENDEAVOR_URL=https://dotenv.example.com\nENDEAVOR_CLIENT_ID=dotenv-id\n",
    )
    .expect("write .env");
    // SAFETY: serialised with every other environment test
    unsafe {
        std::env::set_var(ENV_CLIENT_ID, "exported-id");
    }

    // WHEN: Loading the file
    let loaded = load_env_file_from(&env_path).expect("load .env");
    let env = process_env();
    clear_endeavor_env();

    // THEN: Only the unset variable came from the file
    assert!(loaded.loaded);
    assert_eq!(loaded.path.as_deref(), Some(env_path.as_path()));
    assert_eq!(env.get(ENV_URL).map(String::as_str), Some("https://dotenv.example.com"));
    assert_eq!(env.get(ENV_CLIENT_ID).map(String::as_str), Some("exported-id"));
    assert!(!env.contains_key(ENV_CLIENT_SECRET));
}

#[test]
#[serial]
fn given_malformed_env_file_when_loaded_then_env_load_error() {
    let dir = TempDir::new().expect("temp dir");
    let env_path = dir.path().join(".env");
    fs::write(&env_path, "NOT A VALID LINE\n").expect("write .env");

    let err = load_env_file_from(&env_path).unwrap_err();

    assert!(matches!(err, guidelight::ConfigError::EnvLoad { .. }));
}

#[test]
#[serial]
fn given_missing_env_file_when_loaded_then_env_load_error() {
    let dir = TempDir::new().expect("temp dir");

    let result = load_env_file_from(dir.path().join("absent.env"));

    assert!(result.is_err());
}
