// Integration tests for the error taxonomy

use guidelight::error::ConfigError;
use guidelight::{EndeavorError, FieldError, GuidelightError, Url};

/// **VALUE**: The flattened enum still answers "is this a client error?".
///
/// **WHY THIS MATTERS**: Callers written against the error hierarchy catch
/// every 4xx family member with one check.
#[test]
fn given_each_variant_when_classified_then_hierarchy_is_preserved() {
    let fields = vec![FieldError::new("name", "required")];

    let client_family = [
        EndeavorError::client(400u16, "bad", fields.clone()),
        EndeavorError::authentication("no key"),
        EndeavorError::authentication_rejected(401u16),
        EndeavorError::not_found("missing", Vec::new()),
        EndeavorError::validation("invalid", fields),
    ];
    for err in &client_family {
        assert!(err.is_client_error(), "{err} should be a client error");
        assert!(!err.is_server_error());
        assert!(err.is_api_error());
    }

    let server = EndeavorError::server(500u16, "boom");
    assert!(server.is_server_error());
    assert!(!server.is_client_error());

    let read_only = EndeavorError::read_only("endpoint is read only");
    assert!(read_only.is_api_error());
    assert!(!read_only.is_client_error());
    assert_eq!(read_only.status_code(), None);
}

#[test]
fn given_error_when_displayed_then_message_and_location_are_included() {
    let err = EndeavorError::not_found("agent not found", Vec::new());

    let text = err.to_string();

    assert!(text.starts_with("Not Found Error: agent not found"));
    assert!(text.contains("errors.rs"));
    assert_eq!(err.location().file_name(), "errors.rs");
    assert_eq!(err.status_code(), Some(404));
}

#[test]
fn given_unhandled_status_when_displayed_then_names_the_code() {
    let err = EndeavorError::unhandled_status(302u16);

    assert_eq!(err.message(), "unhandled status code 302");
    assert_eq!(err.status_code(), Some(302));
}

#[test]
fn given_json_failure_when_converted_then_becomes_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let err = EndeavorError::from(json_err);

    assert!(matches!(err, EndeavorError::Json { .. }));
    assert!(!err.is_api_error());
}

#[test]
fn given_layer_errors_when_converted_then_root_wraps_them() {
    let endeavor: GuidelightError = EndeavorError::authentication("no key").into();
    let config: GuidelightError = ConfigError::missing_url().into();
    let url: GuidelightError = Url::parse("http://example.com:bad").unwrap_err().into();

    assert!(endeavor.is_authentication());
    assert!(endeavor.as_endeavor().is_some());
    assert!(matches!(config, GuidelightError::Config(ConfigError::MissingUrl { .. })));
    assert!(config.as_endeavor().is_none());
    assert!(matches!(url, GuidelightError::Url(_)));
}

#[test]
fn given_field_error_when_deserialized_then_displays_as_field_colon_error() {
    let field: FieldError =
        serde_json::from_str(r#"{"field": "slug", "error": "taken"}"#).expect("valid JSON");

    assert_eq!(field.to_string(), "slug: taken");
}
