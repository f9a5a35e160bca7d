//! # sqldal
//!
//! A small data-access layer over a single database connection.
//!
//! ## Features
//!
//! - **Named binds only**: values travel as `:name` markers and are never
//!   spliced into SQL text
//! - **Checked identifiers**: table, column and field names are validated
//!   before a statement is built; tables can be restricted to an allow-list
//! - **Row-count aware fetches**: `get_value` / `get_row` report `NotFound`
//!   for zero rows and a cardinality error for more than one
//! - **Pluggable driver**: the façade consumes the [`Connection`] /
//!   [`Statement`] traits; a blocking PostgreSQL driver ships behind the
//!   `postgres` feature
//!
//! ## Usage
//!
//! ```ignore
//! use sqldal::postgres::{PgConfig, PgConnection};
//! use sqldal::{Database, Fields, OrderBy};
//!
//! let mut db = Database::new(PgConnection::connect(&PgConfig::from_env()?)?);
//!
//! let id = db.insert("users", &Fields::new().set("name", "Ann").set("age", 30))?;
//!
//! let name = db.get_value("users", "name", &Fields::new().set("id", id))?;
//!
//! let adults = db.select(
//!     "users",
//!     "id, name",
//!     Some(&Fields::new().set("active", true)),
//!     Some(&OrderBy::new().desc("age")),
//!     Some(10),
//! )?;
//!
//! db.update(
//!     "users",
//!     &Fields::new().set("name", "Anna"),
//!     &Fields::new().set("id", id),
//! )?;
//!
//! db.delete("users", &Fields::new().set("id", id))?;
//! ```

pub mod bind;
pub mod builder;
pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod execute;
pub mod ident;
pub mod placeholder;
pub mod row;
pub mod value;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(test)]
mod mock;

pub use bind::bind_params;
pub use builder::{BuildQuery, BuiltQuery};
pub use config::{DalConfig, UpdateBinding};
pub use database::Database;
pub use driver::{Connection, Statement};
pub use error::{DalError, DalResult, DriverError, DriverErrorKind};
pub use execute::{execute_statement, Executor};
pub use ident::Ident;
pub use row::Row;
pub use value::{Direction, Fields, FromValue, OrderBy, Value};
