//! Shared leaf types for the guidelight workspace.
//!
//! Nothing in here knows about HTTP clients or the Endeavor API. These are the
//! small value types the other crates agree on:
//!
//! - [`ErrorLocation`]: file/line/column captured by `#[track_caller]` error constructors
//! - [`HttpStatusCode`]: status code categorisation used by response mapping
//! - [`RedactedSecret`]: client secrets and tokens that never leak into logs

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::RedactedSecret;
