use crate::{ErrorLocation, RedactedSecret};

/// **VALUE**: Secrets must never show up in `{:?}` output.
///
/// **BUG THIS CATCHES**: Would catch a `#[derive(Debug)]` sneaking back onto
/// `RedactedSecret`, which would print client secrets in every debug log of
/// the client configuration.
#[test]
fn given_secret_when_debug_formatted_then_value_is_hidden() {
    // GIVEN: A secret value
    let secret = RedactedSecret::new("super-secret-value");

    // WHEN: Formatting with Debug and Display
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: Neither contains the value
    assert!(!debug.contains("super-secret-value"));
    assert!(!display.contains("super-secret-value"));
    assert_eq!(secret.expose(), "super-secret-value");
    assert_eq!(secret.len(), 18);
}

#[test]
fn given_secret_when_serialized_then_returns_error() {
    let secret = RedactedSecret::new("token");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err(), "RedactedSecret must refuse serialization");
}

#[test]
fn given_empty_or_missing_value_when_non_empty_called_then_returns_none() {
    assert!(RedactedSecret::non_empty(None).is_none());
    assert!(RedactedSecret::non_empty(Some(String::new())).is_none());
    assert!(RedactedSecret::non_empty(Some("x".to_string())).is_some());
}

#[test]
fn given_caller_location_when_file_name_requested_then_strips_directories() {
    let location = ErrorLocation::caller();

    assert_eq!(location.file_name(), "redacted_secret.rs");
    assert!(location.to_string().contains("redacted_secret.rs"));
}
