//! Console logger for the binary
//!
//! Diagnostics go to stderr so stdout only carries the status lines.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use snafu::prelude::*;

/// Name of the only appender
const APPENDER_STDERR: &str = "stderr";

/// Layout of a log line, `2024/01/31 12:00:00 message`
const LOG_PATTERN: &str = "{d(%Y/%m/%d %H:%M:%S)} {m}{n}";

/// Logger could not be installed
#[derive(Debug, Snafu)]
pub enum LoggerError {
    /// Appender configuration was rejected
    #[snafu(display("invalid logger configuration: {source}"))]
    InvalidConfig {
        source: log4rs::config::runtime::ConfigErrors,
    },

    /// Another logger is already installed
    #[snafu(display("could not install logger: {source}"))]
    AlreadySet { source: log::SetLoggerError },
}

/// Logger configuration writing records at `level` and above to stderr
pub fn config(level: LevelFilter) -> Result<Config, LoggerError> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build(APPENDER_STDERR, Box::new(stderr)))
        .build(Root::builder().appender(APPENDER_STDERR).build(level))
        .context(InvalidConfigSnafu)
}

/// Installs the stderr logger as the global logger
pub fn init(level: LevelFilter) -> Result<(), LoggerError> {
    log4rs::init_config(config(level)?).context(AlreadySetSnafu)?;
    Ok(())
}
