//! Client configuration.
//!
//! Options come from two places: explicit [`ClientOptions`] set by the caller,
//! and an environment mapping consulted for whatever the caller left unset.
//! [`ClientConfig::resolve`] never reads the process environment itself; use
//! [`process_env`] to snapshot it, or build the map by hand in tests.

pub mod host;

pub use host::{detect_scheme, is_local_host};

use crate::endpoint::{Url, split_url};
use crate::error::ConfigError;

use common::RedactedSecret;

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::{debug, info};

pub const ENV_URL: &str = "ENDEAVOR_URL";
pub const ENV_CLIENT_ID: &str = "ENDEAVOR_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "ENDEAVOR_CLIENT_SECRET";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_POOL_CONNECTIONS: usize = 8;
const DEFAULT_POOL_MAXSIZE: usize = 16;
const DEFAULT_MAX_RETRIES: u32 = 3;

const SCHEME_SEPARATOR: &str = "://";
const ENV_FILE_NAME: &str = ".env";

// ============================================
// TIMEOUT
// ============================================

/// Per-request timeouts: time to establish the connection, and time to wait
/// for the response once connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    pub connect: Duration,
    pub read: Duration,
}

impl Timeout {
    pub const fn new(connect: Duration, read: Duration) -> Self {
        Self { connect, read }
    }

    /// The same limit for connecting and reading.
    pub const fn uniform(timeout: Duration) -> Self {
        Self::new(timeout, timeout)
    }

    /// Builds a uniform timeout from fractional seconds.
    ///
    /// # Errors
    /// Returns [`ConfigError::Validation`] for negative, non-finite or zero values.
    pub fn from_secs_f64(secs: f64) -> Result<Self, ConfigError> {
        Ok(Self::uniform(seconds(secs)?))
    }

    /// Builds a `(connect, read)` timeout from fractional seconds.
    pub fn from_secs_pair(connect: f64, read: f64) -> Result<Self, ConfigError> {
        Ok(Self::new(seconds(connect)?, seconds(read)?))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.connect.is_zero() || self.read.is_zero() {
            return Err(ConfigError::validation(format!(
                "timeouts must be positive (connect={:?}, read={:?})",
                self.connect, self.read
            )));
        }
        Ok(())
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }
}

impl From<Duration> for Timeout {
    fn from(timeout: Duration) -> Self {
        Self::uniform(timeout)
    }
}

impl From<(Duration, Duration)> for Timeout {
    fn from((connect, read): (Duration, Duration)) -> Self {
        Self::new(connect, read)
    }
}

fn seconds(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|d| !d.is_zero())
        .ok_or_else(|| ConfigError::validation(format!("invalid timeout: {secs} seconds")))
}

// ============================================
// OPTIONS
// ============================================

/// Explicit configuration supplied by the caller. Unset fields fall back to
/// the environment, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<RedactedSecret>,
    pub timeout: Option<Timeout>,
    pub pool_connections: Option<usize>,
    pub pool_maxsize: Option<usize>,
    pub max_retries: Option<u32>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(RedactedSecret::new(client_secret));
        self
    }

    pub fn timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub fn pool_connections(mut self, pool_connections: usize) -> Self {
        self.pool_connections = Some(pool_connections);
        self
    }

    pub fn pool_maxsize(mut self, pool_maxsize: usize) -> Self {
        self.pool_maxsize = Some(pool_maxsize);
        self
    }

    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// True when any of url, client id or client secret still has to come
    /// from the environment.
    pub fn needs_environment(&self) -> bool {
        is_blank(self.url.as_deref())
            || is_blank(self.client_id.as_deref())
            || self.client_secret.as_ref().is_none_or(RedactedSecret::is_empty)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

// ============================================
// RESOLVED CONFIG
// ============================================

/// Fully resolved configuration the [`crate::Client`] is built from.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base server URL; endpoints are resolved against it.
    pub url: Url,
    /// Network authority (`host[:port]`) of the base URL.
    pub host: String,
    pub client_id: Option<String>,
    pub client_secret: Option<RedactedSecret>,
    pub timeout: Timeout,
    pub pool_connections: usize,
    pub pool_maxsize: usize,
    pub max_retries: u32,
}

impl ClientConfig {
    /// Merges `options` over `env` and applies defaults.
    ///
    /// Empty strings count as unset in both sources. A base URL typed without
    /// `scheme://` gets `http` for local hosts and `https` otherwise.
    ///
    /// # Errors
    /// - [`ConfigError::MissingUrl`] when neither source supplies a URL
    /// - [`ConfigError::InvalidUrl`] when the URL does not parse or has no host
    /// - [`ConfigError::Validation`] for zero timeouts
    pub fn resolve(
        options: ClientOptions,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let raw_url = non_empty(options.url)
            .or_else(|| env_value(env, ENV_URL))
            .ok_or_else(ConfigError::missing_url)?;
        let url = parse_base_url(&raw_url)?;

        let host = url.host().to_string();
        if host.is_empty() {
            return Err(ConfigError::invalid_url(raw_url, "URL has no host"));
        }

        let client_id = non_empty(options.client_id).or_else(|| env_value(env, ENV_CLIENT_ID));
        let client_secret = options
            .client_secret
            .filter(|s| !s.is_empty())
            .or_else(|| RedactedSecret::non_empty(env_value(env, ENV_CLIENT_SECRET)));

        let timeout = options.timeout.unwrap_or_default();
        timeout.validate()?;

        let config = Self {
            url,
            host,
            client_id,
            client_secret,
            timeout,
            pool_connections: options.pool_connections.unwrap_or(DEFAULT_POOL_CONNECTIONS),
            pool_maxsize: options.pool_maxsize.unwrap_or(DEFAULT_POOL_MAXSIZE),
            max_retries: options.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        };

        debug!(
            "Resolved Endeavor config: url={} client_id={} secret={} timeout={:?}",
            config.url,
            config.client_id.as_deref().unwrap_or("<unset>"),
            if config.client_secret.is_some() { "<set>" } else { "<unset>" },
            config.timeout,
        );

        Ok(config)
    }

    pub fn is_localhost(&self) -> bool {
        is_local_host(&self.host)
    }

    /// Scheme the host calls for, regardless of what the URL spelled out.
    pub fn detected_scheme(&self) -> &'static str {
        detect_scheme(&self.host)
    }

    pub fn has_api_key(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

/// A scheme written without `//` (`https:example.com`) is kept; a missing one
/// is detected from the host.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let candidate = if raw.contains(SCHEME_SEPARATOR) {
        raw.to_string()
    } else {
        let split = split_url(raw);
        match split.scheme() {
            "" => format!("{}{SCHEME_SEPARATOR}{raw}", detect_scheme(split.host())),
            scheme => format!("{scheme}{SCHEME_SEPARATOR}{}", &raw[scheme.len() + 1..]),
        }
    };

    Url::parse(&candidate).map_err(|e| ConfigError::invalid_url(raw, e))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn env_value(env: &HashMap<String, String>, key: &str) -> Option<String> {
    non_empty(env.get(key).cloned())
}

// ============================================
// ENVIRONMENT
// ============================================

/// Snapshot of the `ENDEAVOR_*` variables from the process environment.
pub fn process_env() -> HashMap<String, String> {
    [ENV_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET]
        .into_iter()
        .filter_map(|key| env::var(key).ok().map(|value| (key.to_string(), value)))
        .collect()
}

/// Result of attempting to load a `.env` file.
#[derive(Debug)]
pub struct EnvLoadResult {
    /// Path of the loaded file, if one was found.
    pub path: Option<PathBuf>,
    pub loaded: bool,
}

/// Loads `.env` into the process environment, looking in the current
/// directory (and its parents) first, then next to the executable.
///
/// A missing file is not an error. Variables already set in the process
/// environment are never overridden.
///
/// # Errors
/// Returns [`ConfigError::EnvLoad`] when a `.env` file exists but cannot be
/// read or parsed.
pub fn load_env_file() -> Result<EnvLoadResult, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => {
            info!("Loaded .env from: {:?}", path);
            return Ok(EnvLoadResult {
                path: Some(path),
                loaded: true,
            });
        }
        Err(e) if e.not_found() => {}
        Err(e) => return Err(ConfigError::env_load(ENV_FILE_NAME, e)),
    }

    if let Some(env_path) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(ENV_FILE_NAME)))
        .filter(|path| path.exists())
    {
        dotenvy::from_path(&env_path).map_err(|e| ConfigError::env_load(&env_path, e))?;
        info!("Loaded .env from: {:?}", env_path);
        return Ok(EnvLoadResult {
            path: Some(env_path),
            loaded: true,
        });
    }

    debug!("No .env file found - using existing environment variables");
    Ok(EnvLoadResult {
        path: None,
        loaded: false,
    })
}

/// Loads a specific `.env` file into the process environment.
pub fn load_env_file_from(path: impl Into<PathBuf>) -> Result<EnvLoadResult, ConfigError> {
    let path = path.into();
    dotenvy::from_path(&path).map_err(|e| ConfigError::env_load(&path, e))?;
    info!("Loaded .env from: {:?}", path);
    Ok(EnvLoadResult {
        path: Some(path),
        loaded: true,
    })
}
