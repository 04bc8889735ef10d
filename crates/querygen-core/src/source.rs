//! Module: source
//! Responsibility: locate and read annotated SQL sources.
//!
//! A query path is either one file or a directory whose direct `*.sql`
//! children are read in file-name order. Subdirectories are not walked.


use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;
use tracing::debug;

///
/// SourceError
///

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("query path '{0}' is neither a file nor a directory")]
    InvalidPath(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

///
/// QuerySource
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QuerySource {
    pub origin: String,
    pub content: String,
}

impl QuerySource {
    #[must_use]
    pub fn new(origin: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            content: content.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self::new(path.display().to_string(), content))
    }

    /// File name without extension, used as a fallback query name.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        Path::new(&self.origin)
            .file_stem()
            .and_then(OsStr::to_str)
            .filter(|s| !s.is_empty())
    }
}

/// Load every source under `path`.
pub fn load_sources(path: &Path) -> Result<Vec<QuerySource>, SourceError> {
    if path.is_file() {
        return Ok(vec![QuerySource::from_path(path)?]);
    }
    if !path.is_dir() {
        return Err(SourceError::InvalidPath(path.to_path_buf()));
    }

    let read_err = |source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(read_err)? {
        let file = entry.map_err(read_err)?.path();
        if file.is_file() && is_sql_file(&file) {
            files.push(file);
        }
    }
    files.sort();

    debug!(path = %path.display(), count = files.len(), "found sql sources");

    files.iter().map(|f| QuerySource::from_path(f)).collect()
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}
