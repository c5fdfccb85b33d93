use common::ErrorLocation;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Missing URL Error: no Endeavor URL has been configured (set ENDEAVOR_URL) {location}")]
    MissingUrl { location: ErrorLocation },

    #[error("Config Invalid URL Error: {url}: {reason} {location}")]
    InvalidUrl {
        url: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Validation Error: {reason} {location}")]
    Validation {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Env Load Error: {path}: {reason} {location}")]
    EnvLoad {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn missing_url() -> Self {
        ConfigError::MissingUrl {
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        ConfigError::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn validation(reason: impl Into<String>) -> Self {
        ConfigError::Validation {
            reason: reason.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn env_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ConfigError::EnvLoad {
            path: path.into(),
            reason: reason.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<reqwest::Error> for ConfigError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ConfigError::Transport {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}
