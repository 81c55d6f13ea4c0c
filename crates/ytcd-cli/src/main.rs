use clap::Parser;
use ytcd_core::logging;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.command.verbose() {
        logging::init_logging_stderr(true);
    } else if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr(false);
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    match cli.run().await {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(err) => {
            eprintln!("ytcd error: {:#}", err);
            std::process::exit(1);
        }
    }
}
