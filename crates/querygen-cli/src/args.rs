
use crate::CliError;
use clap::Parser;
use querygen_config::Config;
use std::{fmt, path::PathBuf};

///
/// Cli
///

#[derive(Debug, Default, Parser)]
#[command(
    name = "querygen",
    version,
    about = "Generate typed Rust data access modules from a MySQL schema and annotated SQL"
)]
pub struct Cli {
    /// Database user.
    #[arg(long, value_name = "USER")]
    pub db_user: Option<String>,

    /// Database password.
    #[arg(long, value_name = "PASSWORD", env = "QUERYGEN_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database host or IP.
    #[arg(long, value_name = "HOST")]
    pub db_host: Option<String>,

    /// Database port [default: 3306].
    #[arg(long, value_name = "PORT")]
    pub db_port: Option<u16>,

    /// Schema to introspect; also the generated module name.
    #[arg(long, value_name = "NAME")]
    pub db_name: Option<String>,

    /// Directory receiving `<schema>/`.
    #[arg(long, value_name = "DIR")]
    pub output_path: Option<PathBuf>,

    /// Annotated `.sql` file or directory of them.
    #[arg(long, value_name = "PATH")]
    pub queries_path: Option<PathBuf>,

    /// Config file [default: ./querygen.toml when present].
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip the rustfmt pass over generated files.
    #[arg(long)]
    pub no_rustfmt: bool,

    /// Read tables and columns from a TOML snapshot instead of a live database.
    #[arg(long, value_name = "FILE")]
    pub schema_snapshot: Option<PathBuf>,

    /// Debug-level logging (QUERYGEN_LOG overrides).
    #[arg(short, long)]
    pub verbose: bool,
}

///
/// ConnectionArgs
///

#[derive(Clone, Eq, PartialEq)]
pub struct ConnectionArgs {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl fmt::Debug for ConnectionArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionArgs")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .finish()
    }
}

///
/// SchemaSource
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SchemaSource {
    Live(ConnectionArgs),
    Snapshot(PathBuf),
}

///
/// GenerateArgs
/// Fully resolved inputs of one run.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenerateArgs {
    pub schema_name: String,
    pub source: SchemaSource,
    pub output_path: PathBuf,
    pub queries_path: Option<PathBuf>,
    pub rustfmt: bool,
}

impl Cli {
    /// Merge flags over `config`; every missing required value is reported at once.
    pub fn resolve(self, config: &Config) -> Result<GenerateArgs, CliError> {
        let db = &config.database;
        let mut missing = Vec::new();

        let mut require = |value: Option<String>, flag: &'static str| {
            let value = value.filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(flag);
            }
            value.unwrap_or_default()
        };

        let name = require(self.db_name.or_else(|| db.name.clone()), "--db-name");

        let source = match self.schema_snapshot {
            Some(path) => SchemaSource::Snapshot(path),
            None => SchemaSource::Live(ConnectionArgs {
                user: require(self.db_user.or_else(|| db.user.clone()), "--db-user"),
                password: require(
                    self.db_password.or_else(|| db.password.clone()),
                    "--db-password",
                ),
                host: require(self.db_host.or_else(|| db.host.clone()), "--db-host"),
                port: self.db_port.unwrap_or_else(|| config.port()),
                name: name.clone(),
            }),
        };

        let output_path = self.output_path.or_else(|| config.output.path.clone());
        if output_path.is_none() {
            missing.push("--output-path");
        }

        if !missing.is_empty() {
            return Err(CliError::MissingArgs(missing));
        }

        Ok(GenerateArgs {
            schema_name: name,
            source,
            output_path: output_path.unwrap_or_default(),
            queries_path: self.queries_path.or_else(|| config.queries.path.clone()),
            rustfmt: !self.no_rustfmt && config.rustfmt(),
        })
    }
}
