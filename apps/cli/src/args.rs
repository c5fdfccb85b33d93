//! Command-line arguments.

use crate::error::CliError;

use guidelight::config::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_URL};
use guidelight::{ClientOptions, QueryParams, Timeout};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "guidelight")]
#[command(about = "Call the Endeavor API from the command line", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Base URL of the Endeavor server
    #[arg(long, global = true, env = ENV_URL)]
    pub url: Option<String>,

    /// Client ID of the API key
    #[arg(long, global = true, env = ENV_CLIENT_ID)]
    pub client_id: Option<String>,

    /// Client secret of the API key
    #[arg(long, global = true, env = ENV_CLIENT_SECRET, hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Seconds to wait for a connection and for a response
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// Log requests and responses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate and report success
    Auth,
    /// GET an endpoint under /v1
    Get(Endpoint),
    /// DELETE an endpoint under /v1
    Delete(Endpoint),
    /// POST a JSON body to an endpoint under /v1
    Post(EndpointWithBody),
    /// PUT a JSON body to an endpoint under /v1
    Put(EndpointWithBody),
}

#[derive(Debug, Args)]
pub struct Endpoint {
    /// Path segments, e.g. `projects 42 agents`
    pub segments: Vec<String>,

    /// Query parameter as key=value (repeatable)
    #[arg(short, long = "query", value_parser = parse_key_value)]
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct EndpointWithBody {
    #[command(flatten)]
    pub endpoint: Endpoint,

    /// JSON request body
    #[arg(short, long, value_parser = parse_json, default_value = "{}")]
    pub data: Value,
}

impl Endpoint {
    /// `None` when no `--query` was given.
    pub fn query_params(&self) -> Option<QueryParams> {
        if self.query.is_empty() {
            return None;
        }
        Some(self.query.iter().cloned().collect())
    }
}

impl GlobalArgs {
    pub fn client_options(&self) -> Result<ClientOptions, CliError> {
        let mut options = ClientOptions::new();

        if let Some(url) = &self.url {
            options = options.url(url);
        }
        if let Some(client_id) = &self.client_id {
            options = options.client_id(client_id);
        }
        if let Some(client_secret) = &self.client_secret {
            options = options.client_secret(client_secret);
        }
        if let Some(seconds) = self.timeout {
            let timeout = Timeout::from_secs_f64(seconds)
                .map_err(|e| CliError::argument(format!("--timeout: {e}")))?;
            options = options.timeout(timeout);
        }

        Ok(options)
    }
}

pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{raw}`")),
    }
}

pub fn parse_json(raw: &str) -> Result<Value, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {e}"))
}
