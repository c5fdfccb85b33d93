//! HTTP transport: a pooled reqwest client plus connection-level retries.
//!
//! Only failures to establish a connection (DNS, refused socket, connect
//! timeout) are retried. Once a request may have reached the server it is
//! never sent again.

use crate::config::ClientConfig;
use crate::error::{ConfigError, EndeavorError};

use std::time::Duration;

use backoff::{ExponentialBackoff, backoff::Backoff};
use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, RequestBuilder, Response};
use tokio::time::sleep as TokioSleep;

const RETRY_INITIAL_INTERVAL: Duration = Duration::from_millis(100);
const RETRY_MAX_INTERVAL: Duration = Duration::from_secs(2);
const RETRY_MULTIPLIER: f64 = 1.5;

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    max_retries: u32,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig, headers: HeaderMap) -> Result<Self, ConfigError> {
        debug!(
            "Building transport: connect_timeout={:?} read_timeout={:?} pool_connections={} pool_maxsize={} max_retries={}",
            config.timeout.connect,
            config.timeout.read,
            config.pool_connections,
            config.pool_maxsize,
            config.max_retries,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.timeout.connect)
            .read_timeout(config.timeout.read)
            .pool_max_idle_per_host(config.pool_maxsize)
            .build()?;

        Ok(Self {
            http,
            max_retries: config.max_retries,
        })
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Sends the request, retrying connection failures up to `max_retries`
    /// times with exponential backoff.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response, EndeavorError> {
        let request = request.build()?;
        let mut backoff = retry_backoff();
        let mut retries = 0;

        loop {
            let Some(attempt) = request.try_clone() else {
                // Streaming bodies cannot be replayed; send once.
                return Ok(self.http.execute(request).await?);
            };

            match self.execute(attempt).await {
                Err(e) if e.is_connect() && retries < self.max_retries => {
                    retries += 1;
                    let delay = backoff.next_backoff().unwrap_or(RETRY_MAX_INTERVAL);
                    warn!(
                        "Connection to {} failed (retry {retries}/{} after {delay:?}): {e}",
                        request.url(),
                        self.max_retries,
                    );
                    TokioSleep(delay).await;
                }
                result => return Ok(result?),
            }
        }
    }

    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.http.execute(request).await
    }
}

/// Unjittered: 100 ms, 150 ms, 225 ms, ... capped at 2 s.
pub(crate) fn retry_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: RETRY_INITIAL_INTERVAL,
        initial_interval: RETRY_INITIAL_INTERVAL,
        max_interval: RETRY_MAX_INTERVAL,
        multiplier: RETRY_MULTIPLIER,
        randomization_factor: 0.0,
        max_elapsed_time: None,
        ..Default::default()
    }
}
