use common::ErrorLocation;

use guidelight::GuidelightError;

use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error from the client library
    #[error(transparent)]
    Guidelight(#[from] GuidelightError),

    /// A command-line value that clap accepted but the library rejects
    #[error("Argument Error: {message} {location}")]
    Argument {
        message: String,
        location: ErrorLocation,
    },

    /// Failure writing the response
    #[error("Output Error: {message} {location}")]
    Output {
        message: String,
        location: ErrorLocation,
    },

    /// Logger setup failure
    #[error("Logger Error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn argument(message: impl Into<String>) -> Self {
        CliError::Argument {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        CliError::Logger {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// Process exit code: 2 for usage problems, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Argument { .. } => 2,
            _ => 1,
        }
    }
}

impl From<guidelight::EndeavorError> for CliError {
    fn from(error: guidelight::EndeavorError) -> Self {
        CliError::Guidelight(error.into())
    }
}

impl From<std::io::Error> for CliError {
    #[track_caller]
    fn from(error: std::io::Error) -> Self {
        CliError::Output {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        CliError::Output {
            message: format!("Failed to format JSON: {error}"),
            location: ErrorLocation::caller(),
        }
    }
}
