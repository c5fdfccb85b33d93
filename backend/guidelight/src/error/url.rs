use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum UrlError {
    #[error("URL Parse Error: {url}: {reason} {location}")]
    Parse {
        url: String,
        reason: String,
        location: ErrorLocation,
    },
}

impl UrlError {
    #[track_caller]
    pub fn parse(url: impl Into<String>, reason: impl ToString) -> Self {
        UrlError::Parse {
            url: url.into(),
            reason: reason.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
