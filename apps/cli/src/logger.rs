//! Logging for the guidelight command-line client.
//!
//! Logs go to stderr (colored) so that stdout carries only the response
//! payload, plus an optional plain-text file.

use crate::error::CliError;

use std::io::stderr;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, debug, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Target used by the client library for request traces.
const REQUEST_LOG_TARGET: &str = "endeavor";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Level for `--verbose`: request traces and client internals.
const VERBOSE_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// Default level: only warnings such as 4xx/5xx responses and retries.
const QUIET_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        QUIET_LOG_LEVEL
    }
}

/// Initialize the logger.
///
/// Safe to call multiple times; later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or another logger is
/// already installed in the process.
pub fn initialize(verbose: bool, log_file: Option<&Path>) -> Result<(), CliError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let level = level_for(verbose);
    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(level, log_file);
        if result.is_ok() {
            debug!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

#[track_caller]
fn initialize_internal(level: LevelFilter, log_file: Option<&Path>) -> Result<(), CliError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    // Dependencies stay at warn even when verbose.
    let base_dispatch = Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for(REQUEST_LOG_TARGET, level)
        .level_for("guidelight", level)
        .level_for("guidelight_cli", level);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
            ))
        })
        .chain(stderr());

    let mut dispatch = base_dispatch.chain(stderr_dispatch);

    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .map_err(|e| CliError::logger(format!("Failed to create log file: {e}")))?;

        let file_dispatch = Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{target}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    target = record.target(),
                ))
            })
            .chain(file);

        dispatch = dispatch.chain(file_dispatch);
    }

    dispatch
        .apply()
        .map_err(|e| CliError::logger(format!("Failed to initialize logger: {e}")))?;

    Ok(())
}
