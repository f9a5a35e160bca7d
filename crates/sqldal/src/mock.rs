//! Scripted in-memory driver for unit tests.

use crate::driver::{Connection, Statement};
use crate::error::{DalError, DalResult, DriverError};
use crate::placeholder;
use crate::row::Row;
use crate::value::Value;
use std::collections::VecDeque;

/// What the next statement does when prepared/executed.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Rows {
        columns: Vec<&'static str>,
        rows: Vec<Vec<Value>>,
    },
    Affected(u64),
    Fail(DriverError),
    FailPrepare(DriverError),
}

/// A statement the mock executed, with its binds in bind order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Executed {
    pub sql: String,
    pub binds: Vec<(String, Value)>,
}

#[derive(Debug, Default)]
pub(crate) struct MockConnection {
    script: VecDeque<Outcome>,
    executed: Vec<Executed>,
    last_insert_id: Option<i64>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, outcome: Outcome) -> Self {
        self.script.push_back(outcome);
        self
    }

    pub fn rows(self, columns: Vec<&'static str>, rows: Vec<Vec<Value>>) -> Self {
        self.respond(Outcome::Rows { columns, rows })
    }

    pub fn last_insert_id(mut self, id: i64) -> Self {
        self.last_insert_id = Some(id);
        self
    }

    pub fn executed(&self) -> &[Executed] {
        &self.executed
    }
}

impl Connection for MockConnection {
    type Statement<'c> = MockStatement<'c>;

    fn prepare(&mut self, sql: &str) -> DalResult<MockStatement<'_>> {
        if matches!(self.script.front(), Some(Outcome::FailPrepare(_))) {
            if let Some(Outcome::FailPrepare(err)) = self.script.pop_front() {
                return Err(err.into());
            }
        }
        Ok(MockStatement {
            conn: self,
            sql: sql.to_string(),
            bound: Vec::new(),
            rows: VecDeque::new(),
            row_count: 0,
        })
    }

    fn last_insert_id(&mut self) -> DalResult<i64> {
        self.last_insert_id
            .ok_or_else(|| DriverError::other("no insert id available").into())
    }
}

#[derive(Debug)]
pub(crate) struct MockStatement<'c> {
    conn: &'c mut MockConnection,
    sql: String,
    bound: Vec<(String, Value)>,
    rows: VecDeque<Row>,
    row_count: u64,
}

impl MockStatement<'_> {
    pub fn bound(&self) -> &[(String, Value)] {
        &self.bound
    }
}

impl Statement for MockStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, name: &str, value: &Value) -> DalResult<()> {
        match self.bound.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value.clone(),
            None => self.bound.push((name.to_string(), value.clone())),
        }
        Ok(())
    }

    fn execute(&mut self) -> DalResult<()> {
        for marker in placeholder::markers(&self.sql) {
            if !self.bound.iter().any(|(n, _)| *n == marker.name) {
                return Err(DalError::bind(format!(
                    "no value bound for marker ':{}'",
                    marker.name
                )));
            }
        }
        self.conn.executed.push(Executed {
            sql: self.sql.clone(),
            binds: self.bound.clone(),
        });

        match self.conn.script.pop_front().unwrap_or(Outcome::Affected(0)) {
            Outcome::Rows { columns, rows } => {
                let columns: Vec<String> = columns.into_iter().map(String::from).collect();
                self.rows = rows
                    .into_iter()
                    .map(|values| Row::new(columns.clone(), values))
                    .collect::<DalResult<_>>()?;
                self.row_count = self.rows.len() as u64;
                Ok(())
            }
            Outcome::Affected(n) => {
                self.row_count = n;
                Ok(())
            }
            Outcome::Fail(err) | Outcome::FailPrepare(err) => Err(err.into()),
        }
    }

    fn row_count(&self) -> u64 {
        self.row_count
    }

    fn fetch_row(&mut self) -> DalResult<Option<Row>> {
        Ok(self.rows.pop_front())
    }
}
