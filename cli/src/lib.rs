//! Queries a Starlink dish over gRPC and prints a terse health summary.
//!
//! [`run`] sequences the whole request lifecycle: resolve the command line,
//! create one connection, send one `get_status` call, print the reply.

#[macro_use]
pub mod macros;
pub mod config;
pub mod grpc;
pub mod logger;
pub mod output;

pub use crate::config::Config;

use crate::config::ArgumentError;
use crate::grpc::{ConnectOptions, ConnectionError, Connector, DeviceConnection, InvokeError};
use crate::output::FormatError;
use snafu::prelude::*;
use std::ffi::OsString;
use std::io::Write;

/// Failure of one stage of [`run`]
#[derive(Debug, Snafu)]
pub enum Error {
    /// Command line was rejected before any network activity
    #[snafu(display("parse arguments: {source}"))]
    Arguments { source: ArgumentError },

    /// Connection object could not be created
    #[snafu(display("create client: {source}"))]
    Connection { source: ConnectionError },

    /// The status call failed
    #[snafu(display("handle(get_status): {source}"))]
    Invoke { source: InvokeError },

    /// The reply could not be printed
    #[snafu(display("format status: {source}"))]
    Format { source: FormatError },
}

/// Runs one status query with `args` (program name excluded) and writes the
/// summary to `out`.
///
/// Once created, the connection is closed exactly once before returning,
/// whatever the outcome. A failed close is logged and does not change the
/// result.
pub async fn run<I, T, W, C>(args: I, out: &mut W, connector: &C) -> Result<(), Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    C: Connector,
{
    let config = Config::try_from_args(args).context(ArgumentsSnafu)?;
    cli_debug!("(run) {:?}.", config);

    let options = ConnectOptions { plaintext: true };
    let mut connection = connector
        .connect(&config.address, &options)
        .context(ConnectionSnafu)?;

    let result = query(&mut connection, &config, out).await;

    if let Err(e) = connection.close().await {
        cli_warn!("(run) close: {}.", e);
    }

    result
}

async fn query<D, W>(connection: &mut D, config: &Config, out: &mut W) -> Result<(), Error>
where
    D: DeviceConnection,
    W: Write,
{
    let response = grpc::get_status(connection, config.timeout, config.wait_ready)
        .await
        .context(InvokeSnafu)?;

    output::write_status(&response, out).context(FormatSnafu)?;
    cli_info!("(run) status of {} written.", config.address);

    Ok(())
}
