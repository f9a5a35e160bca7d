//! UPDATE statement builder.

use super::{check_fields, require_conditions, where_clause, BuildQuery, BuiltQuery};
use crate::config::UpdateBinding;
use crate::error::{DalError, DalResult};
use crate::ident::check_table;
use crate::placeholder;
use crate::value::Fields;
use std::collections::BTreeSet;

/// `UPDATE <table> SET a = :a, ... WHERE id = :id AND ...`
#[derive(Debug, Clone)]
pub struct UpdateQuery<'a> {
    table: &'a str,
    data: &'a Fields,
    conditions: &'a Fields,
    binding: UpdateBinding,
    allowed_tables: Option<&'a BTreeSet<String>>,
}

impl<'a> UpdateQuery<'a> {
    pub fn new(table: &'a str, data: &'a Fields, conditions: &'a Fields) -> Self {
        Self {
            table,
            data,
            conditions,
            binding: UpdateBinding::default(),
            allowed_tables: None,
        }
    }

    /// Choose how SET and WHERE values are bound.
    pub fn binding(mut self, binding: UpdateBinding) -> Self {
        self.binding = binding;
        self
    }

    pub fn allowed_tables(mut self, allowed: Option<&'a BTreeSet<String>>) -> Self {
        self.allowed_tables = allowed;
        self
    }

    /// Marker names for the WHERE clause, renaming those that collide with SET.
    fn scoped_where_markers(&self) -> Vec<(&'a str, String)> {
        let mut taken: Vec<String> = Vec::new();
        let mut out = Vec::with_capacity(self.conditions.len());

        for name in self.conditions.names() {
            let mut marker = name.to_string();
            if self.data.contains(name) {
                marker = format!("{name}_where");
                let mut n = 2;
                while self.data.contains(&marker)
                    || self.conditions.contains(&marker)
                    || taken.contains(&marker)
                {
                    marker = format!("{name}_where{n}");
                    n += 1;
                }
            }
            taken.push(marker.clone());
            out.push((name, marker));
        }

        out
    }
}

impl BuildQuery for UpdateQuery<'_> {
    fn build(&self) -> DalResult<BuiltQuery> {
        let table = check_table(self.table, self.allowed_tables)?;
        if self.data.is_empty() {
            return Err(DalError::validation("UPDATE requires at least one field to set"));
        }
        require_conditions("UPDATE", self.conditions)?;
        check_fields(self.data)?;

        let set = placeholder::assignments(self.data).join(", ");

        let (where_sql, binds) = match self.binding {
            UpdateBinding::Merged => (
                where_clause(self.conditions)?,
                self.data.clone().merge(self.conditions),
            ),
            UpdateBinding::Scoped => {
                check_fields(self.conditions)?;
                let markers = self.scoped_where_markers();
                let where_sql = placeholder::assignments_with_markers(
                    markers.iter().map(|(name, marker)| (*name, marker.as_str())),
                )
                .join(" AND ");

                let mut binds = self.data.clone();
                for ((_, marker), (_, value)) in markers.iter().zip(self.conditions.iter()) {
                    binds.insert(marker.as_str(), value.clone());
                }
                (where_sql, binds)
            }
        };

        let sql = format!("UPDATE {} SET {} WHERE {}", table.to_sql(), set, where_sql);
        Ok(BuiltQuery::new(sql, binds))
    }
}
