//! Parameter binding.

use crate::driver::Statement;
use crate::error::{DalError, DalResult};
use crate::placeholder;
use crate::value::Fields;

/// Bind every field onto its `:name` marker, in mapping order, and return the handle.
///
/// A field whose marker does not appear in the statement text is an error; it
/// is never silently dropped.
pub fn bind_params<S: Statement>(mut stmt: S, fields: &Fields) -> DalResult<S> {
    if fields.is_empty() {
        return Ok(stmt);
    }

    let markers = placeholder::markers(stmt.sql());
    for (name, value) in fields.iter() {
        if !markers.iter().any(|m| m.name == name) {
            return Err(DalError::bind(format!(
                "marker ':{name}' does not appear in statement"
            )));
        }
        stmt.bind(name, value)?;
    }
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::Connection;
    use crate::mock::MockConnection;
    use crate::value::Value;

    #[test]
    fn binds_in_mapping_order() {
        let mut conn = MockConnection::new();
        let stmt = conn.prepare("UPDATE t SET b = :b WHERE a = :a").unwrap();
        let fields = Fields::new().set("b", 2).set("a", "x");
        let stmt = bind_params(stmt, &fields).unwrap();
        assert_eq!(
            stmt.bound(),
            &[
                ("b".to_string(), Value::Integer(2)),
                ("a".to_string(), Value::from("x"))
            ]
        );
    }

    #[test]
    fn unknown_marker_is_an_error() {
        let mut conn = MockConnection::new();
        let stmt = conn.prepare("SELECT * FROM t WHERE a = :a").unwrap();
        let fields = Fields::new().set("a", 1).set("b", 2);
        let err = bind_params(stmt, &fields).unwrap_err();
        assert!(matches!(err, DalError::Bind(_)));
        assert!(err.to_string().contains(":b"));
    }

    #[test]
    fn marker_inside_literal_does_not_count() {
        let mut conn = MockConnection::new();
        let stmt = conn.prepare("SELECT ':a' FROM t").unwrap();
        let fields = Fields::new().set("a", 1);
        assert!(bind_params(stmt, &fields).is_err());
    }
}
