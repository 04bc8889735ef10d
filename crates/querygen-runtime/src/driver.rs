//! Module: driver
//! Responsibility: the seam between generated code and a concrete database
//! client.
//!
//! A driver compiles statements once; a transaction derives short-lived
//! scoped statements from those compiled ones.

use crate::{DriverError, context::Context, row::Row, value::Value};
use std::sync::Arc;

/// Rows produced by a statement, pulled lazily by the runtime.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row, DriverError>> + 'a>;

///
/// ExecResult
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: Option<u64>,
}

///
/// Driver
///

pub trait Driver: Send + Sync {
    /// Compile `sql` into a reusable statement.
    fn prepare(&self, sql: &str) -> Result<Arc<dyn Statement>, DriverError>;

    fn begin(&self, ctx: Option<&Context>) -> Result<Box<dyn Transaction>, DriverError>;
}

///
/// Statement
///

pub trait Statement: Send + Sync {
    fn sql(&self) -> &str;

    fn execute(&self, ctx: Option<&Context>, params: &[Value]) -> Result<ExecResult, DriverError>;

    fn query(&self, ctx: Option<&Context>, params: &[Value]) -> Result<RowIter<'_>, DriverError>;

    fn close(&self) -> Result<(), DriverError>;
}

///
/// Transaction
///
/// Caller-owned. Generated query functions only bind to one; they never
/// commit or roll back.
///

pub trait Transaction: Send {
    /// Derive a statement bound to this transaction from a compiled one.
    fn bind(&mut self, statement: &Arc<dyn Statement>) -> Result<Arc<dyn Statement>, DriverError>;

    fn commit(self: Box<Self>) -> Result<(), DriverError>;

    fn rollback(self: Box<Self>) -> Result<(), DriverError>;
}
