// Unit tests for configuration resolution
// Resolution is pure, so every case builds its own environment map

use crate::config::{
    ClientConfig, ClientOptions, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_URL, Timeout,
};
use crate::error::ConfigError;

use std::collections::HashMap;
use std::time::Duration;

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// **VALUE**: Explicit options beat the environment.
///
/// **BUG THIS CATCHES**: Would catch the fallback order being reversed, which
/// would let a stale `ENDEAVOR_URL` silently override a caller's choice.
#[test]
fn given_options_and_env_when_resolved_then_options_win() {
    // GIVEN: Both sources set every field
    let env = env(&[
        (ENV_URL, "https://env.example.com"),
        (ENV_CLIENT_ID, "env-id"),
        (ENV_CLIENT_SECRET, "env-secret"),
    ]);
    let options = ClientOptions::new()
        .url("https://opt.example.com")
        .client_id("opt-id")
        .client_secret("opt-secret");

    // WHEN: Resolving
    let config = ClientConfig::resolve(options, &env).expect("valid config");

    // THEN: The explicit values are used
    assert_eq!(config.url.to_string(), "https://opt.example.com");
    assert_eq!(config.host, "opt.example.com");
    assert_eq!(config.client_id.as_deref(), Some("opt-id"));
    assert_eq!(
        config.client_secret.as_ref().map(|s| s.expose()),
        Some("opt-secret")
    );
}

#[test]
fn given_only_env_when_resolved_then_env_fills_gaps() {
    let env = env(&[
        (ENV_URL, "https://env.example.com"),
        (ENV_CLIENT_ID, "env-id"),
        (ENV_CLIENT_SECRET, "env-secret"),
    ]);

    let config = ClientConfig::resolve(ClientOptions::new().client_id("opt-id"), &env)
        .expect("valid config");

    assert_eq!(config.url.to_string(), "https://env.example.com");
    assert_eq!(config.client_id.as_deref(), Some("opt-id"));
    assert_eq!(
        config.client_secret.as_ref().map(|s| s.expose()),
        Some("env-secret")
    );
}

/// **VALUE**: Empty strings are treated as unset in both sources.
///
/// **BUG THIS CATCHES**: Would catch `ENDEAVOR_URL=` in a `.env` file
/// producing an empty base URL instead of the missing-URL error.
#[test]
fn given_empty_strings_when_resolved_then_treated_as_unset() {
    let env = env(&[(ENV_URL, ""), (ENV_CLIENT_ID, "env-id")]);
    let options = ClientOptions::new().url("").client_id("");

    let result = ClientConfig::resolve(options, &env);

    assert!(matches!(result, Err(ConfigError::MissingUrl { .. })));
}

#[test]
fn given_empty_option_when_resolved_then_env_value_is_used() {
    let env = env(&[(ENV_URL, "https://env.example.com"), (ENV_CLIENT_ID, "env-id")]);

    let config = ClientConfig::resolve(ClientOptions::new().client_id(""), &env)
        .expect("valid config");

    assert_eq!(config.client_id.as_deref(), Some("env-id"));
    assert!(config.client_secret.is_none());
    assert!(!config.has_api_key());
}

#[test]
fn given_no_url_anywhere_when_resolved_then_missing_url_error() {
    let result = ClientConfig::resolve(ClientOptions::new(), &HashMap::new());

    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::MissingUrl { .. }));
    assert!(err.to_string().contains("no Endeavor URL has been configured"));
}

/// **VALUE**: Bare `host:port` values get a scheme that matches the host.
///
/// **WHY THIS MATTERS**: `ENDEAVOR_URL=localhost:8000` is the common way to
/// point at a development server.
#[test]
fn given_url_without_scheme_when_resolved_then_detected_scheme_is_prepended() {
    let local = ClientConfig::resolve(ClientOptions::new().url("localhost:8000"), &HashMap::new())
        .expect("valid config");
    let remote = ClientConfig::resolve(
        ClientOptions::new().url("endeavor.example.com/api"),
        &HashMap::new(),
    )
    .expect("valid config");

    assert_eq!(local.url.to_string(), "http://localhost:8000");
    assert_eq!(local.host, "localhost:8000");
    assert!(local.is_localhost());
    assert_eq!(local.detected_scheme(), "http");

    assert_eq!(remote.url.to_string(), "https://endeavor.example.com/api");
    assert_eq!(remote.host, "endeavor.example.com");
    assert!(!remote.is_localhost());
}

/// **VALUE**: A scheme typed without `//` is honoured instead of being
/// mistaken for part of the host.
///
/// **BUG THIS CATCHES**: Would catch `https:example.com` being rewritten to
/// `https://https:example.com` and rejected as an invalid port.
#[test]
fn given_scheme_without_slashes_when_resolved_then_scheme_is_kept_and_host_is_found() {
    let config = ClientConfig::resolve(
        ClientOptions::new().url("https:example.com/api"),
        &HashMap::new(),
    )
    .expect("valid config");

    assert_eq!(config.url.to_string(), "https://example.com/api");
    assert_eq!(config.host, "example.com");
    assert_eq!(config.url.scheme(), "https");
}

#[test]
fn given_explicit_scheme_when_resolved_then_it_is_kept() {
    let config = ClientConfig::resolve(
        ClientOptions::new().url("https://localhost:8443"),
        &HashMap::new(),
    )
    .expect("valid config");

    assert_eq!(config.url.scheme(), "https");
    assert_eq!(config.detected_scheme(), "http");
}

#[test]
fn given_invalid_port_when_resolved_then_invalid_url_error() {
    let result = ClientConfig::resolve(
        ClientOptions::new().url("http://example.com:99999"),
        &HashMap::new(),
    );

    assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
}

#[test]
fn given_no_overrides_when_resolved_then_defaults_apply() {
    let config = ClientConfig::resolve(ClientOptions::new().url("https://h.example"), &HashMap::new())
        .expect("valid config");

    assert_eq!(config.timeout, Timeout::new(Duration::from_secs(10), Duration::from_secs(30)));
    assert_eq!(config.pool_connections, 8);
    assert_eq!(config.pool_maxsize, 16);
    assert_eq!(config.max_retries, 3);
}

#[test]
fn given_single_timeout_when_resolved_then_it_sets_connect_and_read() {
    let config = ClientConfig::resolve(
        ClientOptions::new()
            .url("https://h.example")
            .timeout(Duration::from_secs(5)),
        &HashMap::new(),
    )
    .expect("valid config");

    assert_eq!(config.timeout.connect, Duration::from_secs(5));
    assert_eq!(config.timeout.read, Duration::from_secs(5));
}

#[test]
fn given_zero_timeout_when_resolved_then_validation_error() {
    let result = ClientConfig::resolve(
        ClientOptions::new()
            .url("https://h.example")
            .timeout((Duration::from_secs(1), Duration::ZERO)),
        &HashMap::new(),
    );

    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn given_invalid_seconds_when_timeout_built_then_validation_error() {
    assert!(Timeout::from_secs_f64(0.0).is_err());
    assert!(Timeout::from_secs_f64(-1.0).is_err());
    assert!(Timeout::from_secs_f64(f64::NAN).is_err());
    assert_eq!(
        Timeout::from_secs_f64(2.5).expect("positive"),
        Timeout::uniform(Duration::from_millis(2500))
    );
}

#[test]
fn given_options_when_some_credentials_missing_then_environment_is_needed() {
    let complete = ClientOptions::new()
        .url("https://h.example")
        .client_id("id")
        .client_secret("secret");

    assert!(!complete.needs_environment());
    assert!(complete.clone().client_secret("").needs_environment());
    assert!(ClientOptions::new().needs_environment());
}
