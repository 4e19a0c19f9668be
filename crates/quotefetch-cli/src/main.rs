mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use quotefetch_core::{ResponseData, ResultEnvelope};
use tracing::error;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(error) if !error.use_stderr() => error.exit(),
        Err(error) => return fail(CliError::from(error), false),
    };

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => fail(error, cli.pretty),
    }
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let envelope = commands::run(cli).await;
    output::render(&envelope, cli.pretty)
}

/// Reports an uncaught failure, still printing an envelope when possible.
fn fail(error: CliError, pretty: bool) -> ExitCode {
    error!(%error, "quotefetch failed");

    let envelope = ResultEnvelope::<ResponseData>::unexpected(&error);
    if let Err(render_error) = output::render(&envelope, pretty) {
        error!(error = %render_error, "could not write failure envelope");
    }

    ExitCode::from(error.exit_code())
}
