//! Access/refresh token pair returned by the authentication exchanges.
//!
//! Tokens are opaque: presence is the only thing checked. A refresh never
//! edits a `Credentials` value, it produces a new one that replaces the old
//! value in the client's slot.

use common::RedactedSecret;

use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    access_token: Option<RedactedSecret>,
    refresh_token: Option<RedactedSecret>,
}

impl Credentials {
    /// Empty strings are stored as absent tokens.
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: RedactedSecret::non_empty(access_token),
            refresh_token: RedactedSecret::non_empty(refresh_token),
        }
    }

    /// Credentials that can only be used to obtain a new access token.
    pub fn refresh_only(refresh_token: impl Into<String>) -> Self {
        Self::new(None, Some(refresh_token.into()))
    }

    pub fn access_token(&self) -> Option<&RedactedSecret> {
        self.access_token.as_ref()
    }

    pub fn refresh_token(&self) -> Option<&RedactedSecret> {
        self.refresh_token.as_ref()
    }

    /// True when an access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// True when a refresh token is held.
    pub fn is_refreshable(&self) -> bool {
        self.refresh_token.is_some()
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose()))
    }
}

/// Body of a successful `/v1/authenticate` or `/v1/reauthenticate` response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<TokenResponse> for Credentials {
    fn from(response: TokenResponse) -> Self {
        Credentials::new(response.access_token, response.refresh_token)
    }
}
