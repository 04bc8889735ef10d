//! Live schema introspection against MySQL's `information_schema`.

use crate::ConnectionArgs;
use mysql_async::{Conn, OptsBuilder, prelude::Queryable};
use querygen_core::schema::{ColumnInfo, IntrospectError, SchemaIntrospector};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

const TABLES_SQL: &str = "SELECT table_name FROM information_schema.tables \
     WHERE table_schema = ? AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

const COLUMNS_SQL: &str = "SELECT column_name, data_type, column_type \
     FROM information_schema.columns \
     WHERE table_schema = ? AND table_name = ? \
     ORDER BY ordinal_position";

///
/// MysqlIntrospector
///
/// Owns a current-thread runtime so the blocking introspection trait can
/// drive the async client.
///

pub struct MysqlIntrospector {
    runtime: Runtime,
    conn: Option<Conn>,
    schema: String,
}

impl MysqlIntrospector {
    pub fn connect(args: &ConnectionArgs) -> Result<Self, IntrospectError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(IntrospectError::backend)?;

        let opts = OptsBuilder::default()
            .ip_or_hostname(args.host.clone())
            .tcp_port(args.port)
            .user(Some(args.user.clone()))
            .pass(Some(args.password.clone()))
            .db_name(Some(args.name.clone()));

        let conn = runtime
            .block_on(Conn::new(opts))
            .map_err(IntrospectError::backend)?;
        info!(host = %args.host, port = args.port, schema = %args.name, "connected");

        Ok(Self {
            runtime,
            conn: Some(conn),
            schema: args.name.clone(),
        })
    }
}

impl SchemaIntrospector for MysqlIntrospector {
    fn table_names(&mut self) -> Result<Vec<String>, IntrospectError> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;

        let names: Vec<String> = self
            .runtime
            .block_on(conn.exec(TABLES_SQL, (self.schema.as_str(),)))
            .map_err(IntrospectError::backend)?;
        debug!(count = names.len(), "listed tables");

        Ok(names)
    }

    fn columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, IntrospectError> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;

        let rows: Vec<(String, String, String)> = self
            .runtime
            .block_on(conn.exec(COLUMNS_SQL, (self.schema.as_str(), table)))
            .map_err(IntrospectError::backend)?;

        Ok(rows
            .into_iter()
            .map(|(name, data_type, column_type)| ColumnInfo::new(name, data_type, column_type))
            .collect())
    }
}

fn closed() -> IntrospectError {
    IntrospectError::backend("connection closed")
}

impl Drop for MysqlIntrospector {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take()
            && let Err(err) = self.runtime.block_on(conn.disconnect())
        {
            warn!(error = %err, "disconnect failed");
        }
    }
}
