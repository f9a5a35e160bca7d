//! INSERT statement builder.

use super::{check_fields, BuildQuery, BuiltQuery};
use crate::error::{DalError, DalResult};
use crate::ident::{check_table, Ident};
use crate::placeholder;
use crate::value::Fields;
use std::collections::BTreeSet;

/// `INSERT INTO <table>(<k1>, <k2>) VALUES (:k1, :k2) [RETURNING <column>]`
#[derive(Debug, Clone)]
pub struct InsertQuery<'a> {
    table: &'a str,
    data: &'a Fields,
    returning: Option<&'a str>,
    allowed_tables: Option<&'a BTreeSet<String>>,
}

impl<'a> InsertQuery<'a> {
    pub fn new(table: &'a str, data: &'a Fields) -> Self {
        Self {
            table,
            data,
            returning: None,
            allowed_tables: None,
        }
    }

    pub fn returning(mut self, column: Option<&'a str>) -> Self {
        self.returning = column;
        self
    }

    pub fn allowed_tables(mut self, allowed: Option<&'a BTreeSet<String>>) -> Self {
        self.allowed_tables = allowed;
        self
    }
}

impl BuildQuery for InsertQuery<'_> {
    fn build(&self) -> DalResult<BuiltQuery> {
        let table = check_table(self.table, self.allowed_tables)?;
        if self.data.is_empty() {
            return Err(DalError::validation("INSERT requires at least one field"));
        }
        check_fields(self.data)?;

        let columns = self.data.names().collect::<Vec<_>>().join(", ");
        let values = placeholder::values(self.data).join(", ");
        let mut sql = format!(
            "INSERT INTO {}({}) VALUES ({})",
            table.to_sql(),
            columns,
            values
        );
        if let Some(column) = self.returning {
            sql.push_str(" RETURNING ");
            sql.push_str(&Ident::parse(column)?.to_sql());
        }

        Ok(BuiltQuery::new(sql, self.data.clone()))
    }
}
