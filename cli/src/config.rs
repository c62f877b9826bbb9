//! # Config
//!
//! Resolves command line tokens into the options for one status query

use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use snafu::Snafu;
use std::ffi::OsString;
use std::time::Duration;

/// Management address of a dish on its own network
pub const DEFAULT_ADDRESS: &str = "192.168.100.1:9200";

/// Deadline applied to the status call when none is given
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Longest accepted timeout, the range of a signed 64-bit nanosecond count
pub const MAX_TIMEOUT: Duration = Duration::from_secs(i64::MAX as u64 / 1_000_000_000);

/// Name used in usage output
const PROGRAM_NAME: &str = "starlinkctl";

/// struct holding cli configuration options
#[derive(Parser, Debug)]
#[command(
    name = PROGRAM_NAME,
    about = "Print a short health summary of a Starlink dish"
)]
pub struct Cli {
    /// Starlink dish gRPC address (host:port)
    #[arg(long = "addr", value_name = "HOST:PORT", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// RPC timeout (e.g. 3s, 500ms)
    #[arg(long, value_name = "DURATION", default_value = "3s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Wait for the channel to become ready (within the timeout) before failing
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub wait_ready: bool,
}

/// Command line could not be turned into a [`Config`]
#[derive(Debug, Snafu)]
#[snafu(display("{source}"))]
pub struct ArgumentError {
    source: clap::Error,
}

impl ArgumentError {
    /// The user asked for usage instead of a query
    pub fn is_help(&self) -> bool {
        matches!(self.source.kind(), ErrorKind::DisplayHelp)
    }

    /// Prints the message the way clap would before exiting: usage to
    /// stdout, parse errors to stderr.
    pub fn print(&self) -> std::io::Result<()> {
        self.source.print()
    }
}

/// struct holding configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// dish address, `host:port`
    pub address: String,
    /// deadline for the status call, always above zero
    pub timeout: Duration,
    /// block until the channel is ready instead of failing fast
    pub wait_ready: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Default values for Config
    pub fn new() -> Self {
        Config {
            address: DEFAULT_ADDRESS.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            wait_ready: true,
        }
    }

    /// Create a new `Config` from the process arguments, program name excluded
    pub fn try_from_args<I, T>(args: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv = std::iter::once(OsString::from(PROGRAM_NAME))
            .chain(args.into_iter().map(Into::into));
        let cli = Cli::try_parse_from(argv).map_err(|source| ArgumentError { source })?;

        Ok(cli.into())
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            address: cli.address,
            timeout: cli.timeout,
            wait_ready: cli.wait_ready,
        }
    }
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let timeout = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if timeout.is_zero() {
        return Err("timeout must be greater than zero".to_owned());
    }
    if timeout > MAX_TIMEOUT {
        return Err(format!(
            "timeout must not exceed {}",
            humantime::format_duration(MAX_TIMEOUT)
        ));
    }

    Ok(timeout)
}
