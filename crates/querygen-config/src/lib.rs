//! Optional `querygen.toml` configuration.
//!
//! ```toml
//! [database]
//! user = "app"
//! host = "127.0.0.1"
//! port = 3306
//! name = "app"
//!
//! [output]
//! path = "src/db"
//! rustfmt = true
//!
//! [queries]
//! path = "sql"
//! ```
//!
//! Every value is optional here; the CLI merges flags over the file and
//! decides what is missing.


use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::debug;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "querygen.toml";

pub const DEFAULT_PORT: u16 = 3306;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

///
/// Config
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database: DatabaseConfig,
    pub output: OutputConfig,
    pub queries: QueriesConfig,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    pub rustfmt: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QueriesConfig {
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config");

        Self::from_toml_str(&s, path)
    }

    /// Load `path` when given (it must exist); otherwise load the default
    /// file if present, else an empty config.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default = Path::new(DEFAULT_CONFIG_FILE);
        if default.is_file() {
            Self::load(default)
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.database.port.unwrap_or(DEFAULT_PORT)
    }

    #[must_use]
    pub fn rustfmt(&self) -> bool {
        self.output.rustfmt.unwrap_or(true)
    }
}
