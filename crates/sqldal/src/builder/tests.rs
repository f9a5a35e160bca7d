use super::*;
use crate::config::UpdateBinding;
use crate::value::{OrderBy, Value};
use std::collections::BTreeSet;

#[test]
fn test_select_all() {
    let qb = SelectQuery::new("users", "*");
    assert_eq!(qb.to_sql().unwrap(), "SELECT * FROM users");
}

#[test]
fn test_select_with_conditions() {
    let conditions = Fields::new().set("id", 5);
    let built = SelectQuery::new("users", "*")
        .conditions(&conditions)
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM users WHERE id = :id");
    assert_eq!(built.binds, conditions);
}

#[test]
fn test_select_full() {
    let conditions = Fields::new().set("status", "active").set("role", "admin");
    let order = OrderBy::new().desc("created_at").asc("id");
    let sql = SelectQuery::new("users", "id, name")
        .conditions(&conditions)
        .order_by(&order)
        .limit(10)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT id, name FROM users WHERE status = :status AND role = :role \
         ORDER BY created_at DESC, id ASC LIMIT 10"
    );
}

#[test]
fn test_select_empty_modifiers_are_omitted() {
    let conditions = Fields::new();
    let order = OrderBy::new();
    let built = SelectQuery::new("users", "*")
        .conditions(&conditions)
        .order_by(&order)
        .build()
        .unwrap();
    assert_eq!(built.sql, "SELECT * FROM users");
    assert!(built.binds.is_empty());
}

#[test]
fn test_select_rejects_bad_identifiers() {
    assert!(SelectQuery::new("users; --", "*").build().is_err());
    assert!(SelectQuery::new("users", "id; DROP TABLE x").build().is_err());

    let order = OrderBy::new().asc("id DESC, (SELECT 1)");
    assert!(SelectQuery::new("users", "*").order_by(&order).build().is_err());

    let conditions = Fields::new().set("id = 1 OR 1", 1);
    assert!(SelectQuery::new("users", "*").conditions(&conditions).build().is_err());
}

#[test]
fn test_insert() {
    let data = Fields::new().set("name", "Ann").set("age", 30);
    let built = InsertQuery::new("users", &data).build().unwrap();
    assert_eq!(
        built.sql,
        "INSERT INTO users(name, age) VALUES (:name, :age)"
    );
    assert_eq!(built.binds.get("age"), Some(&Value::Integer(30)));
}

#[test]
fn test_insert_returning() {
    let data = Fields::new().set("name", "Ann");
    let sql = InsertQuery::new("users", &data)
        .returning(Some("id"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO users(name) VALUES (:name) RETURNING id");

    assert!(InsertQuery::new("users", &data)
        .returning(Some("id; DROP TABLE users"))
        .build()
        .is_err());
}

#[test]
fn test_insert_requires_data() {
    let err = InsertQuery::new("users", &Fields::new()).build().unwrap_err();
    assert!(err.to_string().contains("at least one field"));
}

#[test]
fn test_update_without_collision() {
    let data = Fields::new().set("status", "done");
    let conditions = Fields::new().set("id", 5);
    let built = UpdateQuery::new("tasks", &data, &conditions).build().unwrap();
    assert_eq!(built.sql, "UPDATE tasks SET status = :status WHERE id = :id");
    assert_eq!(built.binds.names().collect::<Vec<_>>(), vec!["status", "id"]);
}

#[test]
fn test_update_scoped_collision_keeps_both_values() {
    let data = Fields::new().set("id", 7).set("name", "x");
    let conditions = Fields::new().set("id", 5);
    let built = UpdateQuery::new("users", &data, &conditions).build().unwrap();
    assert_eq!(
        built.sql,
        "UPDATE users SET id = :id, name = :name WHERE id = :id_where"
    );
    assert_eq!(built.binds.get("id"), Some(&Value::Integer(7)));
    assert_eq!(built.binds.get("id_where"), Some(&Value::Integer(5)));
}

#[test]
fn test_update_scoped_marker_avoids_existing_names() {
    let data = Fields::new().set("id", 7).set("id_where", 1);
    let conditions = Fields::new().set("id", 5);
    let built = UpdateQuery::new("t", &data, &conditions).build().unwrap();
    assert!(built.sql.ends_with("WHERE id = :id_where2"));
    assert_eq!(built.binds.get("id_where2"), Some(&Value::Integer(5)));
    assert_eq!(built.binds.len(), 3);
}

#[test]
fn test_update_merged_collision_last_assigned_wins() {
    let data = Fields::new().set("id", 7).set("name", "x");
    let conditions = Fields::new().set("id", 5);
    let built = UpdateQuery::new("users", &data, &conditions)
        .binding(UpdateBinding::Merged)
        .build()
        .unwrap();
    assert_eq!(built.sql, "UPDATE users SET id = :id, name = :name WHERE id = :id");
    assert_eq!(built.binds.len(), 2);
    assert_eq!(built.binds.get("id"), Some(&Value::Integer(5)));
}

#[test]
fn test_update_requires_data_and_conditions() {
    let data = Fields::new().set("a", 1);
    assert!(UpdateQuery::new("t", &Fields::new(), &data).build().is_err());
    assert!(UpdateQuery::new("t", &data, &Fields::new()).build().is_err());
}

#[test]
fn test_delete() {
    let conditions = Fields::new().set("id", 5).set("owner", "ann");
    let sql = DeleteQuery::new("users", &conditions).to_sql().unwrap();
    assert_eq!(sql, "DELETE FROM users WHERE id = :id AND owner = :owner");
}

#[test]
fn test_delete_without_conditions_is_rejected() {
    let err = DeleteQuery::new("users", &Fields::new()).build().unwrap_err();
    assert!(err.to_string().contains("DELETE requires at least one condition"));
}

#[test]
fn test_allowed_tables() {
    let allowed: BTreeSet<String> = ["users".to_string()].into_iter().collect();
    let data = Fields::new().set("a", 1);
    assert!(InsertQuery::new("users", &data)
        .allowed_tables(Some(&allowed))
        .build()
        .is_ok());
    assert!(InsertQuery::new("accounts", &data)
        .allowed_tables(Some(&allowed))
        .build()
        .is_err());
}
