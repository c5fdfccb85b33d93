//! Client library for task-oriented AI systems that integrate with Endeavor.
//!
//! ```no_run
//! # async fn run() -> Result<(), guidelight::GuidelightError> {
//! use guidelight::{ClientOptions, connect};
//!
//! let client = connect(ClientOptions::new().url("https://endeavor.example.com")).await?;
//! let projects = client.get(&["projects"], None).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;

mod connect;
#[cfg(test)]
mod tests;

pub use client::{Client, Payload, RequestOptions};
pub use config::{ClientConfig, ClientOptions, Timeout};
pub use connect::connect;
pub use credentials::Credentials;
pub use endpoint::{QueryParams, Url, parse_content_type, parse_host};
pub use error::{ConfigError, EndeavorError, FieldError, GuidelightError, UrlError};
