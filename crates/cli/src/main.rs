//! Campus Cart CLI

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod config;
mod observability;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.logging) {
        report(&error.to_string());

        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);

            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "CLI error output to user")]
fn report(error: &str) {
    eprintln!("{error}");
}
