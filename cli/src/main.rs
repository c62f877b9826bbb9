//! Main function running one status query against a dish.

use log::LevelFilter;
use starlinkctl::grpc::client::GrpcConnector;
use starlinkctl::{cli_error, logger, Error};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let logger_ready = match logger::init(LevelFilter::Warn) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("(logger) {e}");
            false
        }
    };

    let result = {
        let mut stdout = std::io::stdout().lock();
        starlinkctl::run(std::env::args_os().skip(1), &mut stdout, &GrpcConnector).await
    };
    let Err(e) = result else {
        return ExitCode::SUCCESS;
    };

    match e {
        Error::Arguments { source } => {
            // clap prints usage to stdout and parse errors to stderr
            if let Err(e) = source.print() {
                eprintln!("{e}");
            }
            match source.is_help() {
                true => ExitCode::SUCCESS,
                false => ExitCode::from(2),
            }
        }
        e if logger_ready => {
            cli_error!("{}", e);
            ExitCode::FAILURE
        }
        e => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
