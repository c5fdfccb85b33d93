mod client;
mod connect;
mod errors;
mod helpers;
mod endpoint;
