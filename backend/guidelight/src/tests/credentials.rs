use crate::credentials::{Credentials, TokenResponse};

#[test]
fn given_both_tokens_when_constructed_then_authenticated_and_refreshable() {
    let creds = Credentials::new(Some("access".into()), Some("refresh".into()));

    assert!(creds.is_authenticated());
    assert!(creds.is_refreshable());
    assert_eq!(creds.bearer().as_deref(), Some("Bearer access"));
}

/// **VALUE**: Empty tokens count as absent.
///
/// **BUG THIS CATCHES**: Would catch an empty `access_token` from the server
/// being sent as `Authorization: Bearer ` instead of triggering a refresh.
#[test]
fn given_empty_tokens_when_constructed_then_neither_authenticated_nor_refreshable() {
    let creds = Credentials::new(Some(String::new()), Some(String::new()));

    assert!(!creds.is_authenticated());
    assert!(!creds.is_refreshable());
    assert!(creds.bearer().is_none());
}

#[test]
fn given_refresh_only_when_constructed_then_refreshable_but_not_authenticated() {
    let creds = Credentials::refresh_only("refresh");

    assert!(!creds.is_authenticated());
    assert!(creds.is_refreshable());
}

#[test]
fn given_token_response_missing_fields_when_deserialized_then_defaults_to_none() {
    // GIVEN: A body with only an access token
    let response: TokenResponse =
        serde_json::from_str(r#"{"access_token": "abc"}"#).expect("valid JSON");

    // WHEN: Converting to credentials
    let creds = Credentials::from(response);

    // THEN: Only the access token is held
    assert!(creds.is_authenticated());
    assert!(!creds.is_refreshable());
}

#[test]
fn given_credentials_when_debug_formatted_then_tokens_are_redacted() {
    let creds = Credentials::new(Some("secret-access".into()), Some("secret-refresh".into()));

    let debug = format!("{creds:?}");

    assert!(!debug.contains("secret-access"));
    assert!(!debug.contains("secret-refresh"));
}
