//! Statement builders for SELECT / INSERT / UPDATE / DELETE.
//!
//! Builders are pure: they validate identifiers, assemble statement text with
//! named markers and collect the bind set. Nothing is executed here.
//!
//! ```ignore
//! use sqldal::builder::{BuildQuery, SelectQuery};
//!
//! let conditions = Fields::new().set("id", 5);
//! let built = SelectQuery::new("users", "*").conditions(&conditions).build()?;
//! assert_eq!(built.sql, "SELECT * FROM users WHERE id = :id");
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteQuery;
pub use insert::InsertQuery;
pub use select::SelectQuery;
pub use update::UpdateQuery;

use crate::error::{DalError, DalResult};
use crate::ident::Ident;
use crate::placeholder;
use crate::value::Fields;

/// Statement text plus the values to bind to its markers.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Fields,
}

impl BuiltQuery {
    pub fn new(sql: String, binds: Fields) -> Self {
        Self { sql, binds }
    }
}

/// Common interface of the statement builders.
pub trait BuildQuery {
    /// Validate inputs and build statement text with its bind set.
    fn build(&self) -> DalResult<BuiltQuery>;

    /// Statement text only.
    fn to_sql(&self) -> DalResult<String> {
        self.build().map(|q| q.sql)
    }
}

/// Reject field names that are not plain identifiers.
pub(crate) fn check_fields(fields: &Fields) -> DalResult<()> {
    for name in fields.names() {
        Ident::field(name)?;
    }
    Ok(())
}

/// `a = :a AND b = :b`, with field names validated.
pub(crate) fn where_clause(conditions: &Fields) -> DalResult<String> {
    check_fields(conditions)?;
    Ok(placeholder::assignments(conditions).join(" AND "))
}

pub(crate) fn require_conditions(operation: &str, conditions: &Fields) -> DalResult<()> {
    if conditions.is_empty() {
        return Err(DalError::validation(format!(
            "{operation} requires at least one condition"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
