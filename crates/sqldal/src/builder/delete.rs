//! DELETE statement builder.

use super::{require_conditions, where_clause, BuildQuery, BuiltQuery};
use crate::error::DalResult;
use crate::ident::check_table;
use crate::value::Fields;
use std::collections::BTreeSet;

/// `DELETE FROM <table> WHERE a = :a AND ...`
///
/// An empty condition mapping is rejected rather than deleting every row.
#[derive(Debug, Clone)]
pub struct DeleteQuery<'a> {
    table: &'a str,
    conditions: &'a Fields,
    allowed_tables: Option<&'a BTreeSet<String>>,
}

impl<'a> DeleteQuery<'a> {
    pub fn new(table: &'a str, conditions: &'a Fields) -> Self {
        Self {
            table,
            conditions,
            allowed_tables: None,
        }
    }

    pub fn allowed_tables(mut self, allowed: Option<&'a BTreeSet<String>>) -> Self {
        self.allowed_tables = allowed;
        self
    }
}

impl BuildQuery for DeleteQuery<'_> {
    fn build(&self) -> DalResult<BuiltQuery> {
        let table = check_table(self.table, self.allowed_tables)?;
        require_conditions("DELETE", self.conditions)?;

        let sql = format!(
            "DELETE FROM {} WHERE {}",
            table.to_sql(),
            where_clause(self.conditions)?
        );
        Ok(BuiltQuery::new(sql, self.conditions.clone()))
    }
}
