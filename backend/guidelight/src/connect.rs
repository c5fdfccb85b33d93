//! Top-level entry point: configure, build and authenticate a client.

use crate::client::Client;
use crate::config::{self, ClientConfig, ClientOptions};
use crate::error::GuidelightError;

use log::info;

/// Connects to Endeavor and authenticates eagerly.
///
/// When any of url, client id or client secret is missing from `options`, a
/// `.env` file is loaded first (current directory, then the executable's
/// directory). Remaining gaps are filled from the process environment.
///
/// # Errors
/// Configuration problems surface as [`GuidelightError::Config`]; a failed
/// authentication pre-flight as [`GuidelightError::Endeavor`].
pub async fn connect(options: ClientOptions) -> Result<Client, GuidelightError> {
    if options.needs_environment() {
        config::load_env_file()?;
    }

    let config = ClientConfig::resolve(options, &config::process_env())?;
    let client = Client::new(config)?;

    client.authenticate().await?;
    info!("Connected to Endeavor at {}", client.url());

    Ok(client)
}
