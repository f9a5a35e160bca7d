//! Driver interface consumed by the façade.
//!
//! A driver supplies a [`Connection`] that prepares statements with named
//! `:name` markers, and a [`Statement`] handle that binds, executes and yields
//! rows. Calls block until the driver returns.

use crate::error::DalResult;
use crate::row::Row;
use crate::value::Value;

/// A database connection able to prepare statements.
pub trait Connection {
    /// Statement handle; borrows the connection for as long as it lives.
    type Statement<'c>: Statement
    where
        Self: 'c;

    /// Prepare statement text containing named markers.
    fn prepare(&mut self, sql: &str) -> DalResult<Self::Statement<'_>>;

    /// Identifier generated by the most recent INSERT on this connection.
    fn last_insert_id(&mut self) -> DalResult<i64>;
}

/// A prepared, possibly executed statement.
pub trait Statement {
    /// The statement text as prepared (with named markers).
    fn sql(&self) -> &str;

    /// Bind a value to the marker `:name`.
    fn bind(&mut self, name: &str, value: &Value) -> DalResult<()>;

    /// Execute with the currently bound values.
    fn execute(&mut self) -> DalResult<()>;

    /// Rows affected by a write, or rows returned by a query.
    fn row_count(&self) -> u64;

    /// Next result row, or `None` at end of results.
    fn fetch_row(&mut self) -> DalResult<Option<Row>>;

    /// Drain the remaining rows.
    fn fetch_all(&mut self) -> DalResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_row()? {
            rows.push(row);
        }
        Ok(rows)
    }
}
