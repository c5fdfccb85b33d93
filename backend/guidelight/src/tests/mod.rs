mod config;
mod credentials;
mod endpoint;
mod host;
mod response;
