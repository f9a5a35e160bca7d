//! SELECT statement builder.

use super::{BuildQuery, BuiltQuery, where_clause};
use crate::error::{DalError, DalResult};
use crate::ident::{check_table, Ident, Projection};
use crate::value::{Fields, OrderBy};
use std::collections::BTreeSet;

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT n]`
#[derive(Debug, Clone)]
pub struct SelectQuery<'a> {
    table: &'a str,
    columns: &'a str,
    conditions: Option<&'a Fields>,
    order_by: Option<&'a OrderBy>,
    limit: Option<u64>,
    allowed_tables: Option<&'a BTreeSet<String>>,
}

impl<'a> SelectQuery<'a> {
    /// `columns` is `*` or a comma-separated list of identifiers.
    pub fn new(table: &'a str, columns: &'a str) -> Self {
        Self {
            table,
            columns,
            conditions: None,
            order_by: None,
            limit: None,
            allowed_tables: None,
        }
    }

    /// Match rows where every field equals its value.
    pub fn conditions(mut self, conditions: &'a Fields) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Optional form of [`conditions`](Self::conditions).
    pub fn conditions_opt(mut self, conditions: Option<&'a Fields>) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn order_by(mut self, order_by: &'a OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn order_by_opt(mut self, order_by: Option<&'a OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn limit_opt(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    /// Restrict the table to an allow-list.
    pub fn allowed_tables(mut self, allowed: Option<&'a BTreeSet<String>>) -> Self {
        self.allowed_tables = allowed;
        self
    }
}

impl BuildQuery for SelectQuery<'_> {
    fn build(&self) -> DalResult<BuiltQuery> {
        let table = check_table(self.table, self.allowed_tables)?;
        let projection = Projection::parse(self.columns)?;

        let mut sql = format!("SELECT {} FROM {}", projection.to_sql(), table.to_sql());
        let mut binds = Fields::new();

        if let Some(conditions) = self.conditions.filter(|c| !c.is_empty()) {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause(conditions)?);
            binds = conditions.clone();
        }

        if let Some(order_by) = self.order_by.filter(|o| !o.is_empty()) {
            let mut parts = Vec::new();
            for (column, direction) in order_by.iter() {
                let column = Ident::parse(column)
                    .map_err(|e| DalError::validation(format!("ORDER BY: {e}")))?;
                parts.push(format!("{} {}", column.to_sql(), direction.as_sql()));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&parts.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_string());
        }

        Ok(BuiltQuery::new(sql, binds))
    }
}
