//! Blocking PostgreSQL driver.
//!
//! Wraps a `tokio_postgres::Client` and drives it on a private current-thread
//! runtime, so every call blocks the calling thread until the server answers.
//! Named `:markers` are rewritten to `$n` at prepare time.
//!
//! # Example
//!
//! ```ignore
//! use sqldal::postgres::{PgConfig, PgConnection};
//! use sqldal::{Database, Fields};
//!
//! let conn = PgConnection::connect(&PgConfig::from_env()?)?;
//! let mut db = Database::new(conn);
//! let n = db.delete("sessions", &Fields::new().set("user_id", 5))?;
//! ```

mod config;
mod types;

pub use config::PgConfig;

use crate::driver::{Connection, Statement};
use crate::error::{DalError, DalResult};
use crate::placeholder;
use crate::row::Row;
use crate::value::Value;
use std::collections::VecDeque;
use tokio::runtime::Runtime;
use tokio_postgres::types::ToSql;
use tokio_postgres::NoTls;

/// A single PostgreSQL connection.
///
/// Dropping it closes the connection.
pub struct PgConnection {
    runtime: Runtime,
    client: tokio_postgres::Client,
}

impl PgConnection {
    /// Open a connection.
    ///
    /// Failures are returned as [`DalError::Connection`].
    pub fn connect(config: &PgConfig) -> DalResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DalError::Connection(format!("failed to start runtime: {e}")))?;

        let (client, connection) = runtime
            .block_on(config.as_pg_config().connect(NoTls))
            .map_err(|e| DalError::Connection(e.to_string()))?;

        runtime.spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "sqldal.postgres", error = %e, "connection error");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        });

        Ok(Self { runtime, client })
    }

    /// Run one or more statements without parameters or results.
    pub fn batch_execute(&mut self, sql: &str) -> DalResult<()> {
        self.runtime.block_on(self.client.batch_execute(sql))?;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_closed()
    }
}

impl Connection for PgConnection {
    type Statement<'c> = PgStatement<'c>;

    fn prepare(&mut self, sql: &str) -> DalResult<PgStatement<'_>> {
        let (positional, params) = PositionalParams::rewrite(sql);
        let statement = self.runtime.block_on(self.client.prepare(&positional))?;
        Ok(PgStatement {
            conn: self,
            sql: sql.to_string(),
            statement,
            params,
            rows: VecDeque::new(),
            row_count: 0,
        })
    }

    /// `SELECT lastval()`: the value most recently produced by a sequence in
    /// this session.
    fn last_insert_id(&mut self) -> DalResult<i64> {
        let row = self
            .runtime
            .block_on(self.client.query_one("SELECT lastval()", &[]))?;
        row.try_get::<_, i64>(0)
            .map_err(|e| DalError::decode("lastval", e.to_string()))
    }
}

/// Values for `$n` parameters, addressed by their original marker name.
///
/// A name used several times in the text maps to a single parameter.
#[derive(Debug, Clone, PartialEq)]
struct PositionalParams {
    names: Vec<String>,
    values: Vec<Option<Value>>,
}

impl PositionalParams {
    /// Rewrite `:name` markers to `$n` and set up one empty slot per name.
    fn rewrite(sql: &str) -> (String, Self) {
        let (positional, names) = placeholder::to_positional(sql);
        let values = vec![None; names.len()];
        (positional, Self { names, values })
    }

    fn bind(&mut self, name: &str, value: &Value) -> DalResult<()> {
        let idx = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DalError::bind(format!("marker ':{name}' does not appear in statement")))?;
        self.values[idx] = Some(value.clone());
        Ok(())
    }

    /// Parameters in `$n` order; every slot must be bound.
    fn resolve(&self) -> DalResult<Vec<&Value>> {
        self.values
            .iter()
            .zip(&self.names)
            .map(|(value, name)| {
                value
                    .as_ref()
                    .ok_or_else(|| DalError::bind(format!("no value bound for marker ':{name}'")))
            })
            .collect()
    }
}

/// A prepared statement on a [`PgConnection`].
pub struct PgStatement<'c> {
    conn: &'c mut PgConnection,
    sql: String,
    statement: tokio_postgres::Statement,
    params: PositionalParams,
    rows: VecDeque<Row>,
    row_count: u64,
}

impl Statement for PgStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, name: &str, value: &Value) -> DalResult<()> {
        self.params.bind(name, value)
    }

    fn execute(&mut self) -> DalResult<()> {
        let params: Vec<&(dyn ToSql + Sync)> = self
            .params
            .resolve()?
            .into_iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect();

        let conn = &*self.conn;
        if self.statement.columns().is_empty() {
            let affected = conn
                .runtime
                .block_on(conn.client.execute(&self.statement, &params))?;
            self.rows.clear();
            self.row_count = affected;
        } else {
            let rows = conn
                .runtime
                .block_on(conn.client.query(&self.statement, &params))?;
            self.rows = rows
                .iter()
                .map(types::decode_row)
                .collect::<DalResult<VecDeque<_>>>()?;
            self.row_count = rows.len() as u64;
        }
        Ok(())
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn fetch_row(&mut self) -> DalResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
