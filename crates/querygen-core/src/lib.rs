//! ## Crate layout
//! - `naming`: canonical identifier normalization for generated symbols.
//! - `types`: database column type to Rust type mapping.
//! - `sql`: statement splitting, comment stripping, annotations, projections.
//! - `query`: the validated query descriptor and the batch compiler.
//! - `schema`: table/column model and the introspection seam.
//! - `source`: loading annotated query files from disk.
//!
//! Everything here is pure front-end work; emission lives in `querygen-build`.

pub mod naming;
pub mod query;
pub mod schema;
pub mod source;
pub mod sql;
pub mod types;

use crate::{
    query::ValidationError, schema::IntrospectError, source::SourceError, types::TypeError,
};
use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        naming::normalize,
        query::{NamedQuery, QueryCompiler, ResultMode, ResultShape, compile_sources},
        schema::{ColumnInfo, SchemaIntrospector, SchemaSnapshot, Table, TableField, introspect},
        source::{QuerySource, load_sources},
        types::{DbType, TargetType, map_type},
    };
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Introspect(#[from] IntrospectError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
