//! In-memory driver for tests: scripted responses keyed by SQL text, with
//! counters for compiles, scoped closes and transaction outcomes.

use crate::{
    DriverError,
    context::Context,
    driver::{Driver, ExecResult, RowIter, Statement, Transaction},
    row::Row,
    value::Value,
};
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

///
/// MockResponse
///

#[derive(Clone, Debug)]
pub enum MockResponse {
    Rows(Vec<Row>),
    /// Yields the rows, then fails.
    RowsThenError(Vec<Row>, String),
    Exec(ExecResult),
    Error(String),
}

///
/// MockCall
///

#[derive(Clone, Debug, PartialEq)]
pub struct MockCall {
    pub sql: String,
    pub params: Vec<Value>,
    pub scoped: bool,
    pub with_context: bool,
}

#[derive(Debug, Default)]
struct MockState {
    prepares: AtomicUsize,
    scoped_binds: AtomicUsize,
    scoped_closes: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
    prepare_delay: Mutex<Option<Duration>>,
    responses: Mutex<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockState {
    fn respond(&self, sql: &str) -> Option<MockResponse> {
        self.responses.lock().get(sql).cloned()
    }

    fn record(&self, sql: &str, params: &[Value], scoped: bool, ctx: Option<&Context>) {
        self.calls.lock().push(MockCall {
            sql: sql.to_string(),
            params: params.to_vec(),
            scoped,
            with_context: ctx.is_some(),
        });
    }
}

///
/// MockDriver
///

#[derive(Clone, Debug, Default)]
pub struct MockDriver {
    state: Arc<MockState>,
}

impl MockDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow every compile down, widening the window for racing callers.
    pub fn set_prepare_delay(&self, delay: Duration) {
        *self.state.prepare_delay.lock() = Some(delay);
    }

    pub fn respond(&self, sql: impl Into<String>, response: MockResponse) {
        self.state.responses.lock().insert(sql.into(), response);
    }

    #[must_use]
    pub fn prepare_count(&self) -> usize {
        self.state.prepares.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn scoped_binds(&self) -> usize {
        self.state.scoped_binds.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn scoped_closes(&self) -> usize {
        self.state.scoped_closes.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn rollbacks(&self) -> usize {
        self.state.rollbacks.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.calls.lock().clone()
    }
}

impl Driver for MockDriver {
    fn prepare(&self, sql: &str) -> Result<Arc<dyn Statement>, DriverError> {
        self.state.prepares.fetch_add(1, Ordering::SeqCst);

        let delay = *self.state.prepare_delay.lock();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }

        Ok(Arc::new(MockStatement {
            sql: sql.to_string(),
            state: Arc::clone(&self.state),
            scoped: false,
        }))
    }

    fn begin(&self, _ctx: Option<&Context>) -> Result<Box<dyn Transaction>, DriverError> {
        Ok(Box::new(MockTransaction {
            state: Arc::clone(&self.state),
        }))
    }
}

///
/// MockStatement
///

struct MockStatement {
    sql: String,
    state: Arc<MockState>,
    scoped: bool,
}

impl Statement for MockStatement {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn execute(&self, ctx: Option<&Context>, params: &[Value]) -> Result<ExecResult, DriverError> {
        self.state.record(&self.sql, params, self.scoped, ctx);

        match self.state.respond(&self.sql) {
            Some(MockResponse::Exec(result)) => Ok(result),
            Some(MockResponse::Rows(rows)) => Ok(ExecResult {
                rows_affected: rows.len() as u64,
                last_insert_id: None,
            }),
            Some(MockResponse::Error(message) | MockResponse::RowsThenError(_, message)) => {
                Err(DriverError::new(message))
            }
            None => Ok(ExecResult::default()),
        }
    }

    fn query(&self, ctx: Option<&Context>, params: &[Value]) -> Result<RowIter<'_>, DriverError> {
        self.state.record(&self.sql, params, self.scoped, ctx);

        match self.state.respond(&self.sql) {
            Some(MockResponse::Rows(rows)) => Ok(Box::new(rows.into_iter().map(Ok))),
            Some(MockResponse::RowsThenError(rows, message)) => Ok(Box::new(
                rows.into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(DriverError::new(message)))),
            )),
            Some(MockResponse::Error(message)) => Err(DriverError::new(message)),
            Some(MockResponse::Exec(_)) | None => Ok(Box::new(std::iter::empty())),
        }
    }

    fn close(&self) -> Result<(), DriverError> {
        if self.scoped {
            self.state.scoped_closes.fetch_add(1, Ordering::SeqCst);
        }

        Ok(())
    }
}

///
/// MockTransaction
///

struct MockTransaction {
    state: Arc<MockState>,
}

impl Transaction for MockTransaction {
    fn bind(&mut self, statement: &Arc<dyn Statement>) -> Result<Arc<dyn Statement>, DriverError> {
        self.state.scoped_binds.fetch_add(1, Ordering::SeqCst);

        Ok(Arc::new(MockStatement {
            sql: statement.sql().to_string(),
            state: Arc::clone(&self.state),
            scoped: true,
        }))
    }

    fn commit(self: Box<Self>) -> Result<(), DriverError> {
        self.state.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<(), DriverError> {
        self.state.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
