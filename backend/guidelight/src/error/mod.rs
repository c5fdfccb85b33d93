pub mod config;
pub mod endeavor;
pub mod url;

pub use self::config::ConfigError;
pub use self::endeavor::{EndeavorError, FieldError};
pub use self::url::UrlError;

use thiserror::Error;

/// Root of every error the library returns.
///
/// Most operations return the more specific [`EndeavorError`],
/// [`ConfigError`] or [`UrlError`]; the `connect` entry point spans all three
/// and returns this.
#[derive(Debug, Error)]
pub enum GuidelightError {
    #[error(transparent)]
    Endeavor(#[from] EndeavorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Url(#[from] UrlError),
}

impl GuidelightError {
    /// The Endeavor API error, if this is one.
    pub fn as_endeavor(&self) -> Option<&EndeavorError> {
        match self {
            GuidelightError::Endeavor(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the caller should fix its client id, secret or tokens.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            GuidelightError::Endeavor(EndeavorError::Authentication { .. })
        )
    }
}
