//! The `querygen` command: argument handling, logging, live introspection
//! and the generation pipeline.

pub mod args;
pub mod generate;
pub mod introspect;
pub mod logging;

pub use args::{Cli, ConnectionArgs, GenerateArgs, SchemaSource};
pub use generate::{Summary, run};

use querygen_build::BuildError;
use querygen_config::{Config, ConfigError};
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] querygen_core::Error),

    #[error("missing required arguments: {}", .0.join(", "))]
    MissingArgs(Vec<&'static str>),
}

/// Load configuration, merge it under the flags and run generation.
pub fn execute(cli: Cli) -> Result<Summary, CliError> {
    let config = Config::discover(cli.config.as_deref())?;
    let args = cli.resolve(&config)?;

    run(&args)
}
