//! Statement execution.

use crate::config::DalConfig;
use crate::driver::Statement;
use crate::error::DalResult;

/// Executes bound statements.
///
/// With the `tracing` feature enabled each execution emits a debug event under
/// the `sqldal.sql` target, and failures a warn event. Nothing is logged
/// otherwise.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    #[cfg(feature = "tracing")]
    max_sql_length: Option<usize>,
}

impl Executor {
    pub fn new(config: &DalConfig) -> Self {
        #[cfg(not(feature = "tracing"))]
        let _ = config;
        Self {
            #[cfg(feature = "tracing")]
            max_sql_length: config.max_log_sql_length,
        }
    }

    /// Execute the statement and hand it back for reading results.
    ///
    /// Driver failures come back as [`DalError::Driver`](crate::DalError::Driver);
    /// nothing is retried.
    pub fn execute<S: Statement>(&self, mut stmt: S) -> DalResult<S> {
        #[cfg(feature = "tracing")]
        let started = std::time::Instant::now();

        let result = stmt.execute();

        #[cfg(feature = "tracing")]
        self.trace(stmt.sql(), started.elapsed(), &result, stmt.row_count());

        result.map(|()| stmt)
    }

    #[cfg(feature = "tracing")]
    fn trace(
        &self,
        sql: &str,
        elapsed: std::time::Duration,
        result: &DalResult<()>,
        row_count: u64,
    ) {
        let sql = match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        };
        match result {
            Ok(()) => tracing::debug!(
                target: "sqldal.sql",
                sql = %sql,
                row_count,
                elapsed_us = elapsed.as_micros() as u64,
            ),
            Err(err) => tracing::warn!(
                target: "sqldal.sql",
                sql = %sql,
                error = %err,
                elapsed_us = elapsed.as_micros() as u64,
            ),
        }
    }
}

/// Execute with default settings.
pub fn execute_statement<S: Statement>(stmt: S) -> DalResult<S> {
    Executor::default().execute(stmt)
}

#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::bind_params;
    use crate::driver::Connection;
    use crate::error::{DalError, DriverError, DriverErrorKind};
    use crate::mock::{MockConnection, Outcome};
    use crate::value::Fields;

    #[test]
    fn success_returns_handle() {
        let mut conn = MockConnection::new().respond(Outcome::Affected(3));
        let stmt = conn.prepare("DELETE FROM t WHERE a = :a").unwrap();
        let stmt = bind_params(stmt, &Fields::new().set("a", 1)).unwrap();
        let stmt = execute_statement(stmt).unwrap();
        assert_eq!(stmt.row_count(), 3);
    }

    #[test]
    fn unbound_marker_fails_before_reaching_driver() {
        let mut conn = MockConnection::new().respond(Outcome::Affected(3));
        let stmt = conn.prepare("DELETE FROM t WHERE a = :a").unwrap();
        let err = execute_statement(stmt).unwrap_err();
        assert!(matches!(err, DalError::Bind(_)));
        assert!(conn.executed().is_empty());
    }

    #[test]
    fn driver_failure_is_a_value() {
        let mut conn = MockConnection::new().respond(Outcome::Fail(DriverError::new(
            DriverErrorKind::Syntax,
            "syntax error at or near \"FORM\"",
        )));
        let stmt = conn.prepare("SELECT * FORM t").unwrap();
        let err = execute_statement(stmt).unwrap_err();
        match err {
            DalError::Driver(e) => {
                assert_eq!(e.kind(), DriverErrorKind::Syntax);
                assert!(e.message().contains("FORM"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT * FROM users", 10), "SELECT * F");
        assert_eq!(truncate_sql_bytes("é", 1), "");
    }
}
