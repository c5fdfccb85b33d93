// Unit tests for response mapping
// Covers status classification and error message derivation without a server

use crate::client::{ErrorBody, Payload, client_error_message, map_response, parse_error_body};
use crate::error::{EndeavorError, FieldError};

use common::HttpStatusCode;

use serde_json::json;

const HOST: &str = "endeavor.example.com";
const JSON: Option<&str> = Some("application/json");

// ============================================
// SUCCESS
// ============================================

#[test]
fn given_204_when_mapped_then_payload_is_empty() {
    let payload = map_response(HttpStatusCode(204), JSON, b"", HOST).expect("204 succeeds");

    assert_eq!(payload, Payload::Empty);
}

/// **VALUE**: JSON detection goes through the parsed media type.
///
/// **BUG THIS CATCHES**: Would catch a plain string comparison against the raw
/// header, which misses `application/json; charset=utf-8`.
#[test]
fn given_json_with_charset_when_mapped_then_payload_is_json() {
    let payload = map_response(
        HttpStatusCode(200),
        Some("Application/JSON; charset=utf-8"),
        br#"{"id": 7}"#,
        HOST,
    )
    .expect("200 succeeds");

    assert_eq!(payload, Payload::Json(json!({"id": 7})));
}

#[test]
fn given_non_json_content_when_mapped_then_payload_is_raw_bytes() {
    let payload = map_response(HttpStatusCode(201), Some("text/csv"), b"a,b\n1,2", HOST)
        .expect("201 succeeds");

    assert_eq!(payload, Payload::Bytes(b"a,b\n1,2".to_vec()));
}

#[test]
fn given_missing_content_type_when_mapped_then_payload_is_raw_bytes() {
    let payload = map_response(HttpStatusCode(200), None, b"{}", HOST).expect("200 succeeds");

    assert_eq!(payload, Payload::Bytes(b"{}".to_vec()));
}

#[test]
fn given_malformed_json_body_when_mapped_then_returns_json_error() {
    let result = map_response(HttpStatusCode(200), JSON, b"{not json", HOST);

    assert!(matches!(result, Err(EndeavorError::Json { .. })));
}

// ============================================
// ERRORS
// ============================================

#[test]
fn given_401_or_403_when_mapped_then_authentication_error() {
    for status in [401, 403] {
        let err = map_response(HttpStatusCode(status), JSON, b"{}", HOST).unwrap_err();

        assert!(matches!(err, EndeavorError::Authentication { .. }));
        assert_eq!(err.message(), "authentication failed");
        assert_eq!(err.status_code(), Some(status));
    }
}

/// **VALUE**: Field errors are listed under the summary, one per line.
///
/// **BUG THIS CATCHES**: Would catch a change in indentation or separator that
/// breaks callers that show these messages to users.
#[test]
fn given_error_and_field_errors_when_message_derived_then_lines_are_indented() {
    // GIVEN: A typical validation body
    let body = parse_error_body(
        br#"{"error": "invalid project", "errors": [
            {"field": "name", "error": "required"},
            {"field": "slug", "error": "too long"}
        ]}"#,
    );

    // WHEN: Deriving the message
    let message = client_error_message(HttpStatusCode(400), &body, HOST);

    // THEN: Summary, then one indented line per field
    assert_eq!(message, "invalid project:\n  name: required\n  slug: too long");
}

#[test]
fn given_field_errors_without_summary_when_message_derived_then_fallback_is_prefix() {
    let body = ErrorBody {
        error: None,
        errors: Some(vec![FieldError::new("name", "required")]),
    };

    let message = client_error_message(HttpStatusCode(422), &body, HOST);

    assert_eq!(
        message,
        "422 response from endeavor.example.com:\n  name: required"
    );
}

#[test]
fn given_non_json_error_body_when_parsed_then_treated_as_empty() {
    let body = parse_error_body(b"<html>Bad Gateway</html>");

    assert!(body.error.is_none());
    assert!(body.errors.is_none());
}

/// **VALUE**: `error` and `errors` are read independently.
///
/// **BUG THIS CATCHES**: Would catch a field error missing its `error` key
/// causing the whole body to be discarded, replacing the server's summary
/// with the generic fallback.
#[test]
fn given_partial_field_error_when_parsed_then_summary_is_kept() {
    let body = parse_error_body(br#"{"error":"bad","errors":[{"field":"x"}]}"#);

    assert_eq!(body.error.as_deref(), Some("bad"));
    assert_eq!(body.errors.as_deref(), Some(&[FieldError::new("x", "")][..]));
}

#[test]
fn given_malformed_errors_list_when_parsed_then_summary_is_kept() {
    let body = parse_error_body(br#"{"error":"bad","errors":"not a list"}"#);

    assert_eq!(body.error.as_deref(), Some("bad"));
    assert!(body.errors.is_none());
}

#[test]
fn given_400_when_mapped_then_client_error_carries_fields() {
    let err = map_response(
        HttpStatusCode(400),
        JSON,
        br#"{"errors": [{"field": "name", "error": "required"}]}"#,
        HOST,
    )
    .unwrap_err();

    assert!(matches!(err, EndeavorError::Client { .. }));
    assert!(err.is_client_error());
    assert_eq!(err.status_code(), Some(400));
    assert_eq!(err.fields(), &[FieldError::new("name", "required")]);
}

#[test]
fn given_404_when_mapped_then_not_found() {
    let err = map_response(HttpStatusCode(404), Some("text/html"), b"nope", HOST).unwrap_err();

    assert!(matches!(err, EndeavorError::NotFound { .. }));
    assert!(err.is_client_error());
    assert_eq!(err.message(), "404 response from endeavor.example.com");
}

#[test]
fn given_5xx_when_mapped_then_server_error_uses_error_field_only() {
    let err = map_response(
        HttpStatusCode(503),
        JSON,
        br#"{"error": "maintenance", "errors": [{"field": "x", "error": "y"}]}"#,
        HOST,
    )
    .unwrap_err();

    assert!(err.is_server_error());
    assert!(!err.is_client_error());
    assert_eq!(err.message(), "maintenance");
}

#[test]
fn given_5xx_without_body_when_mapped_then_fallback_message() {
    let err = map_response(HttpStatusCode(500), None, b"", HOST).unwrap_err();

    assert_eq!(err.message(), "500 response from endeavor.example.com");
}

#[test]
fn given_informational_or_redirect_status_when_mapped_then_unhandled() {
    for status in [101, 302, 600] {
        let err = map_response(HttpStatusCode(status), None, b"", HOST).unwrap_err();

        assert!(matches!(err, EndeavorError::UnhandledStatus { .. }));
        assert!(!err.is_client_error());
        assert!(!err.is_server_error());
    }
}

#[test]
fn given_bytes_payload_when_into_json_then_returns_json_error() {
    let result: Result<serde_json::Value, _> = Payload::Bytes(b"x".to_vec()).into_json();

    assert!(matches!(result, Err(EndeavorError::Json { .. })));
}
