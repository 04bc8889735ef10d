use crate::{
    Error,
    context::{self, Context},
    driver::{Driver, Transaction},
    statement::{BoundStatement, StatementCache},
};
use std::{fmt, sync::Arc};
use tracing::warn;

///
/// Runtime
///
/// Explicit handle shared by every generated function of a module. Clones
/// share the driver and the statement cache.
///

#[derive(Clone)]
pub struct Runtime {
    driver: Arc<dyn Driver>,
    cache: Arc<StatementCache>,
}

impl Runtime {
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            cache: Arc::new(StatementCache::new()),
        }
    }

    #[must_use]
    pub const fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }

    #[must_use]
    pub fn cache(&self) -> &StatementCache {
        &self.cache
    }

    /// Resolve `sql` through the cache, binding it to `tx` when one is given.
    pub fn statement(
        &self,
        tx: Option<&mut dyn Transaction>,
        sql: &str,
    ) -> Result<BoundStatement, Error> {
        let base = self.cache.get_or_prepare(self.driver.as_ref(), sql)?;

        match tx {
            Some(tx) => Ok(BoundStatement::scoped(tx.bind(&base)?)),
            None => Ok(BoundStatement::cached(base)),
        }
    }

    pub fn begin(&self, ctx: Option<&Context>) -> Result<Box<dyn Transaction>, Error> {
        context::check(ctx)?;

        Ok(self.driver.begin(ctx)?)
    }

    /// Run `f` inside a new transaction: commit on `Ok`, roll back on `Err`.
    pub fn transaction<T, F>(&self, ctx: Option<&Context>, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn Transaction) -> Result<T, Error>,
    {
        let mut tx = self.begin(ctx)?;

        match f(tx.as_mut()) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    warn!(error = %rollback, "rollback failed after transaction error");
                }
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
