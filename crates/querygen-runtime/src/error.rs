use thiserror::Error as ThisError;

///
/// DriverError
/// Opaque failure reported by the database client.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct DriverError {
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("operation cancelled")]
    Cancelled,

    /// A query whose annotations could not produce a callable shape.
    #[error("query '{query}' is misconfigured: {message}")]
    Config { query: String, message: String },

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("column '{column}': expected {expected}, found {found}")]
    Decode {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("embedded query '{name}' cannot be decoded: {message}")]
    Embedded { name: String, message: String },

    #[error("row has no column {index} ('{column}')")]
    MissingColumn { index: usize, column: String },
}

impl Error {
    pub fn config(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            query: query.into(),
            message: message.into(),
        }
    }

    pub(crate) fn decode(column: &str, expected: &'static str, found: impl Into<String>) -> Self {
        Self::Decode {
            column: column.to_string(),
            expected,
            found: found.into(),
        }
    }
}
