//! Client secrets and bearer tokens with redacted Debug output.

use crate::RedactError;

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// A secret (client secret, access token, refresh token) that never exposes
/// its value in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedSecret {
    inner: String,
}

impl RedactedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: secret.into(),
        }
    }

    /// Wraps `value` unless it is missing or empty.
    ///
    /// Empty strings are treated like absent values everywhere in the client.
    pub fn non_empty(value: Option<String>) -> Option<Self> {
        value.filter(|v| !v.is_empty()).map(Self::new)
    }

    /// The actual value, for placing on the wire.
    ///
    /// # Security Note
    /// Only call this when building a request body or header.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Length of the secret (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedSecret([REDACTED])")
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Request bodies must call expose() explicitly.
impl serde::Serialize for RedactedSecret {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::serialization(
            "RedactedSecret cannot be serialized - use expose() explicitly",
        )))
    }
}
