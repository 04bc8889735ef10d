//! Runtime support linked by generated query modules.
//!
//! ## Crate layout
//! - `driver`: the seam to a concrete database client (statements, transactions).
//! - `statement`: the shared compiled-statement cache and bound statements.
//! - `runtime`: the explicit `Runtime` handle generated code executes through.
//! - `context`: deadlines and cancellation.
//! - `value` / `row`: parameter values and positional row decoding.
//! - `embedded`: decoding the base64 query table baked into generated code.
//! - `mysql` (feature `mysql`): a `Driver` over a `mysql_async` pool.
//!
//! Generated code refers to this crate only through absolute
//! `::querygen_runtime::` paths.

pub mod context;
pub mod driver;
pub mod embedded;
pub mod error;
pub mod row;
pub mod runtime;
pub mod statement;
pub mod types;
pub mod value;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(feature = "mysql")]
pub mod mysql;

pub use error::{DriverError, Error};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error,
        context::{CancelToken, Context},
        driver::{Driver, ExecResult, Statement, Transaction},
        embedded::{EmbeddedQuery, QuerySet},
        row::{FromRow, Row},
        runtime::Runtime,
        value::{FromValue, Value},
    };
}
