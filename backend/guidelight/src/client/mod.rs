//! Endeavor API client.
//!
//! A [`Client`] owns the resolved configuration, a pooled transport and the
//! current [`Credentials`]. Every authenticated request first makes sure an
//! access token is held: stored credentials are reused, a refresh token is
//! exchanged at `/v1/reauthenticate`, and otherwise the API key is exchanged
//! at `/v1/authenticate`.
//!
//! Clones share the credential slot, so one authentication serves them all.

mod response;
mod transport;

pub use response::Payload;

#[cfg(test)]
pub(crate) use response::{ErrorBody, client_error_message, map_response, parse_error_body};
#[cfg(test)]
pub(crate) use transport::retry_backoff;

use crate::config::{ClientConfig, ClientOptions};
use crate::credentials::{Credentials, TokenResponse};
use crate::endpoint::{QueryParams, Url};
use crate::error::{ConfigError, EndeavorError};

use transport::Transport;

use std::collections::HashMap;
use std::sync::Arc;

use const_format::concatcp;
use log::{debug, info};
use reqwest::Method;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue,
    USER_AGENT,
};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;

pub(crate) const LOG_TARGET: &str = "endeavor";

pub const API_VERSION: &str = "v1";
pub const AUTHENTICATE_ENDPOINT: &str = "authenticate";
pub const REAUTHENTICATE_ENDPOINT: &str = "reauthenticate";

pub const ACCEPT_VALUE: &str = "application/json";
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en";
pub const ACCEPT_ENCODING_VALUE: &str = "gzip, deflate, br";
pub const CONTENT_TYPE_VALUE: &str = "application/json; charset=utf-8";
pub const USER_AGENT_VALUE: &str = concatcp!(
    "guidelight/",
    env!("CARGO_PKG_VERSION"),
    " rust/",
    env!("GUIDELIGHT_RUSTC_VERSION")
);

const MISSING_API_KEY: &str = "no client id or secret specified";
const MISSING_REFRESH_TOKEN: &str = "no refresh token available";
const MISSING_ACCESS_TOKEN: &str = "authentication response did not include an access token";

/// Per-request switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Attach a bearer token, authenticating first if needed.
    pub require_authentication: bool,
}

impl RequestOptions {
    pub const fn authenticated() -> Self {
        Self {
            require_authentication: true,
        }
    }

    pub const fn unauthenticated() -> Self {
        Self {
            require_authentication: false,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::authenticated()
    }
}

/// Headers sent with every request.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING_VALUE));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_VALUE));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
    headers
}

#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<ClientConfig>,
    transport: Transport,
    credentials: Arc<Mutex<Option<Credentials>>>,
}

impl Client {
    /// Builds a client without touching the network.
    ///
    /// # Errors
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let transport = Transport::new(&config, default_headers())?;

        info!(
            "Endeavor client configured for {} ({}, {})",
            config.url,
            if config.is_localhost() { "local" } else { "remote" },
            if config.has_api_key() { "API key set" } else { "no API key" },
        );

        Ok(Self {
            config: Arc::new(config),
            transport,
            credentials: Arc::new(Mutex::new(None)),
        })
    }

    /// Resolves `options` over `env` and builds a client.
    pub fn from_options(
        options: ClientOptions,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::new(ClientConfig::resolve(options, env)?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self) -> &Url {
        &self.config.url
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// `http` for local hosts, `https` otherwise.
    pub fn scheme(&self) -> &'static str {
        self.config.detected_scheme()
    }

    pub fn is_localhost(&self) -> bool {
        self.config.is_localhost()
    }

    /// The full URL for `segments` under `/v1`.
    pub fn endpoint<S: AsRef<str>>(&self, segments: &[S], query: Option<&QueryParams>) -> Url {
        let mut path: Vec<&str> = vec!["/", API_VERSION];
        path.extend(segments.iter().map(AsRef::as_ref));
        self.config.url.resolve(&path, query)
    }

    // ============================================
    // VERBS
    // ============================================

    pub async fn get<S: AsRef<str>>(
        &self,
        segments: &[S],
        query: Option<&QueryParams>,
    ) -> Result<Payload, EndeavorError> {
        self.get_with(segments, query, RequestOptions::default())
            .await
    }

    pub async fn get_with<S: AsRef<str>>(
        &self,
        segments: &[S],
        query: Option<&QueryParams>,
        options: RequestOptions,
    ) -> Result<Payload, EndeavorError> {
        self.request(Method::GET, segments, query, None, options)
            .await
    }

    pub async fn post<T: Serialize + ?Sized, S: AsRef<str>>(
        &self,
        data: &T,
        segments: &[S],
        query: Option<&QueryParams>,
    ) -> Result<Payload, EndeavorError> {
        self.post_with(data, segments, query, RequestOptions::default())
            .await
    }

    pub async fn post_with<T: Serialize + ?Sized, S: AsRef<str>>(
        &self,
        data: &T,
        segments: &[S],
        query: Option<&QueryParams>,
        options: RequestOptions,
    ) -> Result<Payload, EndeavorError> {
        let body = serialize_body(data)?;
        self.request(Method::POST, segments, query, Some(body), options)
            .await
    }

    pub async fn put<T: Serialize + ?Sized, S: AsRef<str>>(
        &self,
        data: &T,
        segments: &[S],
        query: Option<&QueryParams>,
    ) -> Result<Payload, EndeavorError> {
        self.put_with(data, segments, query, RequestOptions::default())
            .await
    }

    pub async fn put_with<T: Serialize + ?Sized, S: AsRef<str>>(
        &self,
        data: &T,
        segments: &[S],
        query: Option<&QueryParams>,
        options: RequestOptions,
    ) -> Result<Payload, EndeavorError> {
        let body = serialize_body(data)?;
        self.request(Method::PUT, segments, query, Some(body), options)
            .await
    }

    pub async fn delete<S: AsRef<str>>(
        &self,
        segments: &[S],
        query: Option<&QueryParams>,
    ) -> Result<Payload, EndeavorError> {
        self.delete_with(segments, query, RequestOptions::default())
            .await
    }

    pub async fn delete_with<S: AsRef<str>>(
        &self,
        segments: &[S],
        query: Option<&QueryParams>,
        options: RequestOptions,
    ) -> Result<Payload, EndeavorError> {
        self.request(Method::DELETE, segments, query, None, options)
            .await
    }

    async fn request<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        query: Option<&QueryParams>,
        body: Option<Vec<u8>>,
        options: RequestOptions,
    ) -> Result<Payload, EndeavorError> {
        let bearer = if options.require_authentication {
            Some(self.bearer().await?)
        } else {
            None
        };

        self.dispatch(method, segments, query, body, bearer).await
    }

    async fn dispatch<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        query: Option<&QueryParams>,
        body: Option<Vec<u8>>,
        bearer: Option<String>,
    ) -> Result<Payload, EndeavorError> {
        let url = self.endpoint(segments, query).to_string();
        let mut request = self.transport.request(method.clone(), &url);
        if let Some(bearer) = bearer {
            request = request.header(AUTHORIZATION, bearer);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        debug!(target: LOG_TARGET, "{method} {url}");

        let response = self.transport.send(request).await?;
        response::handle(response, &self.config.host).await
    }

    // ============================================
    // AUTHENTICATION
    // ============================================

    pub async fn is_authenticated(&self) -> bool {
        self.credentials
            .lock()
            .await
            .as_ref()
            .is_some_and(Credentials::is_authenticated)
    }

    pub async fn is_refreshable(&self) -> bool {
        self.credentials
            .lock()
            .await
            .as_ref()
            .is_some_and(Credentials::is_refreshable)
    }

    /// Snapshot of the current credentials.
    pub async fn credentials(&self) -> Option<Credentials> {
        self.credentials.lock().await.clone()
    }

    /// Replaces the stored credentials, e.g. with a refresh token saved by
    /// the caller.
    pub async fn set_credentials(&self, credentials: Credentials) {
        *self.credentials.lock().await = Some(credentials);
    }

    pub async fn clear_credentials(&self) {
        *self.credentials.lock().await = None;
    }

    /// Makes sure an access token is held, exchanging the refresh token or
    /// API key if it is not.
    ///
    /// # Errors
    /// [`EndeavorError::Authentication`] when nothing can be exchanged or the
    /// server rejects the exchange.
    pub async fn authenticate(&self) -> Result<(), EndeavorError> {
        self.bearer().await.map(|_| ())
    }

    /// The `Authorization` header value. The slot stays locked for the whole
    /// exchange.
    async fn bearer(&self) -> Result<String, EndeavorError> {
        let mut slot = self.credentials.lock().await;

        if let Some(bearer) = slot.as_ref().and_then(Credentials::bearer) {
            return Ok(bearer);
        }

        let credentials = match slot.as_ref() {
            Some(current) if current.is_refreshable() => self.reauthenticate(current).await?,
            _ => self.exchange_api_key().await?,
        };

        let bearer = credentials
            .bearer()
            .ok_or_else(|| EndeavorError::authentication(MISSING_ACCESS_TOKEN))?;
        *slot = Some(credentials);

        Ok(bearer)
    }

    async fn exchange_api_key(&self) -> Result<Credentials, EndeavorError> {
        let (Some(client_id), Some(client_secret)) =
            (&self.config.client_id, &self.config.client_secret)
        else {
            return Err(EndeavorError::authentication(MISSING_API_KEY));
        };

        debug!(target: LOG_TARGET, "Authenticating with client id {client_id}");
        let api_key = json!({
            "client_id": client_id,
            "client_secret": client_secret.expose(),
        });

        self.exchange(AUTHENTICATE_ENDPOINT, &api_key).await
    }

    async fn reauthenticate(&self, current: &Credentials) -> Result<Credentials, EndeavorError> {
        let Some(refresh_token) = current.refresh_token() else {
            return Err(EndeavorError::authentication(MISSING_REFRESH_TOKEN));
        };

        debug!(target: LOG_TARGET, "Refreshing access token");
        let refresh = json!({ "refresh_token": refresh_token.expose() });

        self.exchange(REAUTHENTICATE_ENDPOINT, &refresh).await
    }

    async fn exchange(&self, endpoint: &str, body: &Value) -> Result<Credentials, EndeavorError> {
        let body = serialize_body(body)?;
        let payload = self
            .dispatch(Method::POST, &[endpoint], None, Some(body), None)
            .await?;

        let tokens: TokenResponse = match payload {
            Payload::Json(value) => serde_json::from_value(value)?,
            _ => return Err(EndeavorError::authentication(MISSING_ACCESS_TOKEN)),
        };

        Ok(Credentials::from(tokens))
    }
}

fn serialize_body<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>, EndeavorError> {
    serde_json::to_vec(data).map_err(|e| {
        EndeavorError::validation(format!("request body is not valid JSON: {e}"), Vec::new())
    })
}
