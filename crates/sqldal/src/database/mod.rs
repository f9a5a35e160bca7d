//! The data-access façade.

use crate::bind::bind_params;
use crate::builder::{
    BuildQuery, BuiltQuery, DeleteQuery, InsertQuery, SelectQuery, UpdateQuery,
};
use crate::config::DalConfig;
use crate::driver::{Connection, Statement};
use crate::error::{DalError, DalResult};
use crate::ident::Ident;
use crate::row::Row;
use crate::value::{Fields, FromValue, OrderBy, Value};

/// CRUD operations over one owned connection.
///
/// Every operation runs build → prepare → bind → execute → interpret and
/// stops at the first failure. Operations take `&mut self`, so a `Database`
/// never has two statements in flight; use one `Database` per thread.
///
/// The connection is released when the `Database` is dropped (or via
/// [`disconnect`](Self::disconnect)).
///
/// # Example
///
/// ```ignore
/// let mut db = Database::new(conn);
/// let id = db.insert("users", &Fields::new().set("name", "Ann").set("age", 30))?;
/// let name = db.get_value("users", "name", &Fields::new().set("id", id))?;
/// ```
pub struct Database<C: Connection> {
    conn: C,
    config: DalConfig,
    executor: crate::execute::Executor,
}

impl<C: Connection> Database<C> {
    /// Wrap a connection with default configuration.
    pub fn new(conn: C) -> Self {
        Self::with_config(conn, DalConfig::default())
    }

    pub fn with_config(conn: C, config: DalConfig) -> Self {
        let executor = crate::execute::Executor::new(&config);
        Self {
            conn,
            config,
            executor,
        }
    }

    pub fn config(&self) -> &DalConfig {
        &self.config
    }

    /// Direct access to the underlying connection.
    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// Give the connection back to the caller.
    pub fn into_inner(self) -> C {
        self.conn
    }

    /// Close the connection.
    pub fn disconnect(self) {
        drop(self.conn);
    }

    fn run(&mut self, query: &BuiltQuery) -> DalResult<C::Statement<'_>> {
        let stmt = self.conn.prepare(&query.sql)?;
        let stmt = bind_params(stmt, &query.binds)?;
        self.executor.execute(stmt)
    }

    fn fetch_single(&mut self, operation: &'static str, query: &BuiltQuery) -> DalResult<Row> {
        let mut stmt = self.run(query)?;
        let mut rows = stmt.fetch_all()?;
        match rows.len() {
            0 => Err(DalError::not_found(format!("{operation}: no row matched"))),
            1 => Ok(rows.swap_remove(0)),
            n => Err(DalError::Cardinality {
                operation,
                rows: n,
            }),
        }
    }

    /// Fetch one column of the single row matching `conditions`.
    ///
    /// - 0 rows: [`DalError::NotFound`]
    /// - more than 1 row: [`DalError::Cardinality`]
    pub fn get_value(&mut self, table: &str, column: &str, conditions: &Fields) -> DalResult<Value> {
        Ident::parse(column)?;
        let query = SelectQuery::new(table, column)
            .conditions(conditions)
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;
        let row = self.fetch_single("get_value", &query)?;
        row.get_idx(0)
            .cloned()
            .ok_or_else(|| DalError::decode(column, "row has no columns"))
    }

    /// [`get_value`](Self::get_value) converted to `T`.
    pub fn get_value_as<T: FromValue>(
        &mut self,
        table: &str,
        column: &str,
        conditions: &Fields,
    ) -> DalResult<T> {
        let value = self.get_value(table, column, conditions)?;
        T::from_value(value, column)
    }

    /// Fetch the single row matching `conditions`.
    ///
    /// Same row-count rules as [`get_value`](Self::get_value).
    pub fn get_row(&mut self, table: &str, columns: &str, conditions: &Fields) -> DalResult<Row> {
        let query = SelectQuery::new(table, columns)
            .conditions(conditions)
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;
        self.fetch_single("get_row", &query)
    }

    /// Fetch zero or more rows.
    pub fn select(
        &mut self,
        table: &str,
        columns: &str,
        conditions: Option<&Fields>,
        order_by: Option<&OrderBy>,
        limit: Option<u64>,
    ) -> DalResult<Vec<Row>> {
        let query = SelectQuery::new(table, columns)
            .conditions_opt(conditions)
            .order_by_opt(order_by)
            .limit_opt(limit)
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;
        let mut stmt = self.run(&query)?;
        stmt.fetch_all()
    }

    /// Run caller-supplied SQL with optional named parameters and return the
    /// executed handle.
    ///
    /// The text is not validated; only the values are bound.
    pub fn query(&mut self, sql: &str, params: Option<&Fields>) -> DalResult<C::Statement<'_>> {
        let query = BuiltQuery::new(sql.to_string(), params.cloned().unwrap_or_default());
        self.run(&query)
    }

    /// Insert a row and return the generated identifier.
    ///
    /// By default the id comes from [`Connection::last_insert_id`]. On
    /// PostgreSQL that is `lastval()`, the last value produced by any sequence
    /// in the session: inserting into a table without a sequence returns an
    /// earlier insert's id, or fails if there was none. Set
    /// [`DalConfig::insert_returning()`] to read the id from `RETURNING` instead.
    pub fn insert(&mut self, table: &str, data: &Fields) -> DalResult<i64> {
        let query = InsertQuery::new(table, data)
            .returning(self.config.insert_returning.as_deref())
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;

        if self.config.insert_returning.is_none() {
            self.run(&query)?;
            return self.conn.last_insert_id();
        }

        let mut stmt = self.run(&query)?;
        let row = stmt
            .fetch_row()?
            .ok_or_else(|| DalError::not_found("insert: RETURNING produced no row"))?;
        let id = row
            .get_idx(0)
            .cloned()
            .ok_or_else(|| DalError::decode("RETURNING", "row has no columns"))?;
        i64::from_value(id, "RETURNING")
    }

    /// Update rows matching `conditions` and return the affected-row count.
    pub fn update(&mut self, table: &str, data: &Fields, conditions: &Fields) -> DalResult<u64> {
        let query = UpdateQuery::new(table, data, conditions)
            .binding(self.config.update_binding)
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;
        Ok(self.run(&query)?.row_count())
    }

    /// Delete rows matching `conditions` and return the affected-row count.
    pub fn delete(&mut self, table: &str, conditions: &Fields) -> DalResult<u64> {
        let query = DeleteQuery::new(table, conditions)
            .allowed_tables(self.config.allowed_tables.as_ref())
            .build()?;
        Ok(self.run(&query)?.row_count())
    }
}
