//! Module: statement
//! Responsibility: the process-lifetime compiled-statement cache and the
//! per-call bound statement.
//!
//! Invariants:
//! - The cache is keyed by SQL text and never evicts.
//! - Concurrent first use of one SQL text compiles it exactly once.
//! - Cached statements are never closed; transaction-scoped ones are closed
//!   when their `BoundStatement` drops.


use crate::{
    DriverError, Error,
    context::{self, Context},
    driver::{Driver, ExecResult, Statement},
    row::Row,
    value::Value,
};
use parking_lot::RwLock;
use std::{collections::HashMap, fmt, sync::Arc};
use tracing::{debug, warn};

///
/// StatementCache
///

#[derive(Default)]
pub struct StatementCache {
    entries: RwLock<HashMap<String, Arc<dyn Statement>>>,
}

impl StatementCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached statement for `sql`, compiling it on first use.
    pub fn get_or_prepare(
        &self,
        driver: &dyn Driver,
        sql: &str,
    ) -> Result<Arc<dyn Statement>, DriverError> {
        // fast path: shared lock only
        if let Some(stmt) = self.entries.read().get(sql) {
            return Ok(Arc::clone(stmt));
        }

        let mut entries = self.entries.write();

        // another caller may have compiled it while we waited
        if let Some(stmt) = entries.get(sql) {
            return Ok(Arc::clone(stmt));
        }

        let stmt = driver.prepare(sql)?;
        entries.insert(sql.to_string(), Arc::clone(&stmt));
        debug!(sql, cached = entries.len(), "compiled statement");

        Ok(stmt)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[must_use]
    pub fn contains(&self, sql: &str) -> bool {
        self.entries.read().contains_key(sql)
    }
}

impl fmt::Debug for StatementCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementCache")
            .field("len", &self.len())
            .finish()
    }
}

///
/// BoundStatement
///

pub struct BoundStatement {
    inner: Arc<dyn Statement>,
    scoped: bool,
}

impl BoundStatement {
    pub(crate) fn cached(inner: Arc<dyn Statement>) -> Self {
        Self {
            inner,
            scoped: false,
        }
    }

    pub(crate) fn scoped(inner: Arc<dyn Statement>) -> Self {
        Self {
            inner,
            scoped: true,
        }
    }

    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        self.scoped
    }

    pub fn exec(&self, ctx: Option<&Context>, params: &[Value]) -> Result<ExecResult, Error> {
        context::check(ctx)?;

        Ok(self.inner.execute(ctx, params)?)
    }

    /// First row, or `None` when the query matched nothing.
    pub fn query_one(&self, ctx: Option<&Context>, params: &[Value]) -> Result<Option<Row>, Error> {
        context::check(ctx)?;

        let mut rows = self.inner.query(ctx, params)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// All rows, materialized. A failure mid-scan discards the rows read so far.
    pub fn query_many(&self, ctx: Option<&Context>, params: &[Value]) -> Result<Vec<Row>, Error> {
        context::check(ctx)?;

        let mut out = Vec::new();
        for row in self.inner.query(ctx, params)? {
            context::check(ctx)?;
            out.push(row?);
        }

        Ok(out)
    }
}

impl Drop for BoundStatement {
    fn drop(&mut self) {
        if self.scoped
            && let Err(err) = self.inner.close()
        {
            warn!(sql = self.inner.sql(), error = %err, "failed to close transaction-scoped statement");
        }
    }
}

impl fmt::Debug for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundStatement")
            .field("sql", &self.inner.sql())
            .field("scoped", &self.scoped)
            .finish()
    }
}
