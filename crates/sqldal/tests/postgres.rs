//! Live PostgreSQL tests. Skipped unless `DATABASE_URL` is set (a `.env` file works).

#![cfg(feature = "postgres")]

use sqldal::postgres::{PgConfig, PgConnection};
use sqldal::{DalConfig, Database, DalError, DriverErrorKind, Fields, OrderBy, Statement, Value};

fn try_connect() -> Option<Database<PgConnection>> {
    dotenvy::dotenv().ok();
    let config = PgConfig::from_env().ok()?;
    let mut conn = PgConnection::connect(&config).expect("Failed to connect to DATABASE_URL");
    conn.batch_execute(
        "CREATE TEMP TABLE people (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            age INT,
            email TEXT UNIQUE
        )",
    )
    .expect("create temp table");
    Some(Database::new(conn))
}

fn person(name: &str, age: i32, email: &str) -> Fields {
    Fields::new().set("name", name).set("age", age).set("email", email)
}

#[test]
fn insert_get_select_update_delete() {
    let Some(mut db) = try_connect() else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let ann = db.insert("people", &person("Ann", 30, "ann@example.com")).unwrap();
    let bob = db.insert("people", &person("Bob", 41, "bob@example.com")).unwrap();
    assert!(bob > ann);

    let name = db
        .get_value("people", "name", &Fields::new().set("id", ann))
        .unwrap();
    assert_eq!(name, Value::from("Ann"));

    let row = db
        .get_row("people", "id, name, age", &Fields::new().set("id", bob))
        .unwrap();
    assert_eq!(row.try_get::<i32>("age").unwrap(), 41);

    let rows = db
        .select(
            "people",
            "name",
            None,
            Some(&OrderBy::new().desc("age")),
            Some(1),
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::from("Bob")));

    let updated = db
        .update(
            "people",
            &Fields::new().set("age", 31),
            &Fields::new().set("id", ann),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let deleted = db
        .delete("people", &Fields::new().set("name", "Bob"))
        .unwrap();
    assert_eq!(deleted, 1);

    let err = db
        .get_row("people", "*", &Fields::new().set("id", bob))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn get_value_with_two_matches_is_cardinality_error() {
    let Some(mut db) = try_connect() else {
        return;
    };
    db.insert("people", &person("Ann", 30, "a1@example.com")).unwrap();
    db.insert("people", &person("Ann", 31, "a2@example.com")).unwrap();

    let err = db
        .get_value("people", "age", &Fields::new().set("name", "Ann"))
        .unwrap_err();
    assert!(matches!(err, DalError::Cardinality { rows: 2, .. }));
}

#[test]
fn unique_violation_is_reported() {
    let Some(mut db) = try_connect() else {
        return;
    };
    db.insert("people", &person("Ann", 30, "dup@example.com")).unwrap();

    let err = db
        .insert("people", &person("Other", 1, "dup@example.com"))
        .unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(
        err.driver_error().map(|e| e.kind()),
        Some(DriverErrorKind::UniqueViolation)
    );
}

#[test]
fn update_can_change_a_column_it_also_filters_on() {
    let Some(mut db) = try_connect() else {
        return;
    };
    let id = db.insert("people", &person("Ann", 30, "ann@example.com")).unwrap();

    let n = db
        .update(
            "people",
            &Fields::new().set("id", 1000),
            &Fields::new().set("id", id),
        )
        .unwrap();
    assert_eq!(n, 1);
    let name = db
        .get_value_as::<String>("people", "name", &Fields::new().set("id", 1000))
        .unwrap();
    assert_eq!(name, "Ann");
}

#[test]
fn raw_query_with_named_params() {
    let Some(mut db) = try_connect() else {
        return;
    };
    db.insert("people", &person("Ann", 30, "ann@example.com")).unwrap();
    db.insert("people", &person("Bob", 41, "bob@example.com")).unwrap();

    let params = Fields::new().set("min_age", 35);
    let mut stmt = db
        .query(
            "SELECT name, age::text AS age_text FROM people WHERE age > :min_age",
            Some(&params),
        )
        .unwrap();
    assert_eq!(stmt.row_count(), 1);
    let row = stmt.fetch_row().unwrap().unwrap();
    assert_eq!(row.get("name"), Some(&Value::from("Bob")));
    assert_eq!(row.get("age_text"), Some(&Value::from("41")));
}

#[test]
fn insert_id_for_table_without_sequence() {
    let Some(mut db) = try_connect() else {
        return;
    };
    db.connection_mut()
        .batch_execute("CREATE TEMP TABLE codes (code BIGINT PRIMARY KEY, label TEXT)")
        .unwrap();
    let person = db.insert("people", &person("Ann", 30, "ann@example.com")).unwrap();

    // lastval() still reports the people sequence
    let id = db
        .insert("codes", &Fields::new().set("code", 77).set("label", "a"))
        .unwrap();
    assert_eq!(id, person);

    let config = DalConfig::new().insert_returning("code");
    let mut db = Database::with_config(db.into_inner(), config);
    let id = db
        .insert("codes", &Fields::new().set("code", 78).set("label", "b"))
        .unwrap();
    assert_eq!(id, 78);
}
