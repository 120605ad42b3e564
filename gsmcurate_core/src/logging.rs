//! Terminal logger bootstrap
//!
//! The library only emits through the `log` macros. Applications and the Python
//! extension call [`init_logging`] once to see those messages on stderr.
use std::sync::OnceLock;

use log::{info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use thiserror::Error;

static LOG_LEVEL: OnceLock<LevelFilter> = OnceLock::new();

/// Install a stderr logger at `level`
///
/// Calling again with the same level does nothing. A different level, or a logger
/// installed by someone else, is an error.
pub fn init_logging(level: LevelFilter) -> Result<(), LoggingError> {
    if let Some(current) = LOG_LEVEL.get() {
        if *current == level {
            return Ok(());
        }
        return Err(LoggingError::AlreadyInitialized {
            current: *current,
            requested: level,
        });
    }
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    let _ = LOG_LEVEL.set(level);
    info!("Logging initialized at {}", level);
    Ok(())
}

/// Parse a level name such as `"info"` or `"WARN"`
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    level
        .trim()
        .parse()
        .map_err(|_| LoggingError::UnknownLevel(level.to_string()))
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Logging already initialized at level {current}, refusing to switch to {requested}")]
    AlreadyInitialized {
        current: LevelFilter,
        requested: LevelFilter,
    },
    #[error("Unknown log level `{0}`")]
    UnknownLevel(String),
    #[error("Unable to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}
