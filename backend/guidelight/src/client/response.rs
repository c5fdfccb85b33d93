//! Translation of HTTP responses into payloads or typed errors.

use crate::endpoint::parse_content_type;
use crate::error::{EndeavorError, FieldError};

use common::{ErrorLocation, HttpStatusCode};

use log::warn;
use reqwest::Response;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;

const JSON_MIME_TYPE: &str = "application/json";
const FIELD_ERRORS_HEADER: &str = ":\n  ";
const FIELD_ERRORS_SEPARATOR: &str = "\n  ";

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// 204 No Content.
    Empty,
    /// A body served as `application/json`.
    Json(Value),
    /// Any other body, verbatim.
    Bytes(Vec<u8>),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Decodes a JSON payload into `T`.
    ///
    /// # Errors
    /// Returns [`EndeavorError::Json`] when the payload is not JSON or does not
    /// match `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, EndeavorError> {
        match self {
            Payload::Json(value) => Ok(serde_json::from_value(value)?),
            Payload::Empty => Err(EndeavorError::Json {
                message: String::from("response had no content"),
                location: ErrorLocation::caller(),
            }),
            Payload::Bytes(_) => Err(EndeavorError::Json {
                message: String::from("response was not served as JSON"),
                location: ErrorLocation::caller(),
            }),
        }
    }
}

/// JSON error body sent with 4xx and 5xx responses.
#[derive(Debug, Default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub errors: Option<Vec<FieldError>>,
}

/// Reads the body of `response` and maps it by status code.
pub(crate) async fn handle(response: Response, host: &str) -> Result<Payload, EndeavorError> {
    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.bytes().await?;

    map_response(status.into(), content_type.as_deref(), &body, host)
}

pub(crate) fn map_response(
    status: HttpStatusCode,
    content_type: Option<&str>,
    body: &[u8],
    host: &str,
) -> Result<Payload, EndeavorError> {
    if status.is_auth_failure() {
        return Err(EndeavorError::authentication_rejected(status));
    }

    if status == HttpStatusCode::NO_CONTENT {
        return Ok(Payload::Empty);
    }

    if status.is_success() {
        let (mime_type, _) = parse_content_type(content_type.unwrap_or_default());
        return if mime_type == JSON_MIME_TYPE {
            Ok(Payload::Json(serde_json::from_slice(body)?))
        } else {
            Ok(Payload::Bytes(body.to_vec()))
        };
    }

    if status.is_client_error() {
        warn!(target: super::LOG_TARGET, "client error: {status} {}", String::from_utf8_lossy(body));
        let error_body = parse_error_body(body);
        let fields = error_body.errors.clone().unwrap_or_default();
        let message = client_error_message(status, &error_body, host);

        return if status == HttpStatusCode::NOT_FOUND {
            Err(EndeavorError::not_found(message, fields))
        } else {
            Err(EndeavorError::client(status, message, fields))
        };
    }

    if status.is_server_error() {
        warn!(target: super::LOG_TARGET, "server error: {status} {}", String::from_utf8_lossy(body));
        let message = parse_error_body(body)
            .error
            .unwrap_or_else(|| fallback_message(status, host));
        return Err(EndeavorError::server(status, message));
    }

    Err(EndeavorError::unhandled_status(status))
}

/// The `error` field, or the fallback, followed by one indented line per
/// field error.
pub(crate) fn client_error_message(status: HttpStatusCode, body: &ErrorBody, host: &str) -> String {
    let mut message = body
        .error
        .clone()
        .unwrap_or_else(|| fallback_message(status, host));

    if let Some(errors) = &body.errors {
        let lines: Vec<String> = errors.iter().map(FieldError::to_string).collect();
        message.push_str(FIELD_ERRORS_HEADER);
        message.push_str(&lines.join(FIELD_ERRORS_SEPARATOR));
    }

    message
}

fn fallback_message(status: HttpStatusCode, host: &str) -> String {
    format!("{status} response from {host}")
}

/// Reads `error` and `errors` independently so a malformed one does not hide
/// the other. Anything that is not a JSON object is treated as an empty body.
pub(crate) fn parse_error_body(body: &[u8]) -> ErrorBody {
    let Ok(Value::Object(mut object)) = serde_json::from_slice::<Value>(body) else {
        return ErrorBody::default();
    };

    let error = match object.remove("error") {
        Some(Value::String(error)) => Some(error),
        _ => None,
    };
    let errors = match object.remove("errors") {
        Some(Value::Array(entries)) => Some(
            entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
        ),
        _ => None,
    };

    ErrorBody { error, errors }
}
