use clap::{CommandFactory, Parser};
use querygen_cli::{Cli, CliError, execute, logging};
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    info!(version = env!("CARGO_PKG_VERSION"), "querygen");

    match execute(cli) {
        Ok(summary) => {
            info!(
                module = %summary.module,
                tables = summary.tables,
                queries = summary.queries,
                files = summary.files.len(),
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err @ CliError::MissingArgs(_)) => {
            eprintln!("error: {err}\n\n{}", Cli::command().render_usage());
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "generation failed");
            ExitCode::FAILURE
        }
    }
}
