//! Errors raised while talking to an Endeavor server.
//!
//! The server-facing hierarchy is flattened into one enum. Sub-kind
//! relationships are answered by predicates instead of nesting:
//!
//! ```text
//! EndeavorError
//! ├── Server
//! ├── Client            (is_client_error)
//! │   ├── Authentication
//! │   ├── NotFound
//! │   └── Validation
//! └── ReadOnlyEndpoint
//! ```
//!
//! `UnhandledStatus`, `Http` and `Json` cover statuses outside the mapping
//! table and failures below the API layer.

use common::{ErrorLocation, HttpStatusCode};

use std::fmt;

use serde::Deserialize;
use thiserror::Error as ThisError;

/// One entry of the `errors` list in a 4xx response body. Either key may be
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub error: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error: error.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

#[derive(Debug, ThisError)]
pub enum EndeavorError {
    #[error("Server Error: {message} {location}")]
    Server {
        status: HttpStatusCode,
        message: String,
        location: ErrorLocation,
    },

    #[error("Client Error: {message} {location}")]
    Client {
        status: HttpStatusCode,
        message: String,
        fields: Vec<FieldError>,
        location: ErrorLocation,
    },

    /// Rejected or missing credentials. `status` is `None` when the failure
    /// was detected locally, before any request went out.
    #[error("Authentication Error: {message} {location}")]
    Authentication {
        status: Option<HttpStatusCode>,
        message: String,
        location: ErrorLocation,
    },

    #[error("Not Found Error: {message} {location}")]
    NotFound {
        message: String,
        fields: Vec<FieldError>,
        location: ErrorLocation,
    },

    #[error("Validation Error: {message} {location}")]
    Validation {
        message: String,
        fields: Vec<FieldError>,
        location: ErrorLocation,
    },

    #[error("Read Only Endpoint Error: {message} {location}")]
    ReadOnlyEndpoint {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unhandled Status Error: unhandled status code {status} {location}")]
    UnhandledStatus {
        status: HttpStatusCode,
        location: ErrorLocation,
    },

    #[error("HTTP Error: {message} {location}")]
    Http {
        message: String,
        is_timeout: bool,
        is_connection: bool,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },
}

impl EndeavorError {
    #[track_caller]
    pub fn server(status: impl Into<HttpStatusCode>, message: impl Into<String>) -> Self {
        EndeavorError::Server {
            status: status.into(),
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn client(
        status: impl Into<HttpStatusCode>,
        message: impl Into<String>,
        fields: Vec<FieldError>,
    ) -> Self {
        EndeavorError::Client {
            status: status.into(),
            message: message.into(),
            fields,
            location: ErrorLocation::caller(),
        }
    }

    /// Local precondition failure: no request was sent.
    #[track_caller]
    pub fn authentication(message: impl Into<String>) -> Self {
        EndeavorError::Authentication {
            status: None,
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// The server answered 401 or 403.
    #[track_caller]
    pub fn authentication_rejected(status: impl Into<HttpStatusCode>) -> Self {
        EndeavorError::Authentication {
            status: Some(status.into()),
            message: String::from("authentication failed"),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        EndeavorError::NotFound {
            message: message.into(),
            fields,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn validation(message: impl Into<String>, fields: Vec<FieldError>) -> Self {
        EndeavorError::Validation {
            message: message.into(),
            fields,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn read_only(message: impl Into<String>) -> Self {
        EndeavorError::ReadOnlyEndpoint {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn unhandled_status(status: impl Into<HttpStatusCode>) -> Self {
        EndeavorError::UnhandledStatus {
            status: status.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// True for the client-error family: Client, Authentication, NotFound and
    /// Validation.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EndeavorError::Client { .. }
                | EndeavorError::Authentication { .. }
                | EndeavorError::NotFound { .. }
                | EndeavorError::Validation { .. }
        )
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, EndeavorError::Server { .. })
    }

    /// True for errors raised by the API layer itself, as opposed to the
    /// transport or decoding failures underneath it.
    pub fn is_api_error(&self) -> bool {
        self.is_client_error()
            || self.is_server_error()
            || matches!(
                self,
                EndeavorError::ReadOnlyEndpoint { .. } | EndeavorError::UnhandledStatus { .. }
            )
    }

    /// The human-readable message without the error kind or location.
    pub fn message(&self) -> String {
        match self {
            EndeavorError::Server { message, .. }
            | EndeavorError::Client { message, .. }
            | EndeavorError::Authentication { message, .. }
            | EndeavorError::NotFound { message, .. }
            | EndeavorError::Validation { message, .. }
            | EndeavorError::ReadOnlyEndpoint { message, .. }
            | EndeavorError::Http { message, .. }
            | EndeavorError::Json { message, .. } => message.clone(),
            EndeavorError::UnhandledStatus { status, .. } => {
                format!("unhandled status code {status}")
            }
        }
    }

    /// HTTP status behind the error, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            EndeavorError::Server { status, .. }
            | EndeavorError::Client { status, .. }
            | EndeavorError::UnhandledStatus { status, .. } => Some(status.0),
            EndeavorError::Authentication { status, .. } => status.map(|s| s.0),
            EndeavorError::NotFound { .. } => Some(HttpStatusCode::NOT_FOUND.0),
            _ => None,
        }
    }

    /// Per-field detail supplied by the server, if any.
    pub fn fields(&self) -> &[FieldError] {
        match self {
            EndeavorError::Client { fields, .. }
            | EndeavorError::NotFound { fields, .. }
            | EndeavorError::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    pub fn location(&self) -> ErrorLocation {
        match self {
            EndeavorError::Server { location, .. }
            | EndeavorError::Client { location, .. }
            | EndeavorError::Authentication { location, .. }
            | EndeavorError::NotFound { location, .. }
            | EndeavorError::Validation { location, .. }
            | EndeavorError::ReadOnlyEndpoint { location, .. }
            | EndeavorError::UnhandledStatus { location, .. }
            | EndeavorError::Http { location, .. }
            | EndeavorError::Json { location, .. } => *location,
        }
    }
}

impl From<reqwest::Error> for EndeavorError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        // Categorise before the error is flattened into a string.
        EndeavorError::Http {
            is_timeout: error.is_timeout(),
            is_connection: error.is_connect(),
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<serde_json::Error> for EndeavorError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        EndeavorError::Json {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
