mod args;
mod commands;
mod error;
