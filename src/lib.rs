//! # sqlwright
//!
//! Fluent SQL query builder with an active-record layer, over SQLite.
//!
//! A [`QueryBuilder`] accumulates clauses in a fixed set of slots and renders
//! them in canonical order with named `:param` markers. Values never enter
//! the SQL text. Models implementing [`ActiveRecord`] (usually via
//! `#[derive(ActiveRecord)]`) get builders pinned to their table.
//!
//! ```
//! use sqlwright::{Database, Direction, QueryBuilder, SqliteDatabase, Value};
//!
//! let db = SqliteDatabase::open_in_memory()?;
//! db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER)")?;
//!
//! let mut query = QueryBuilder::new(&db);
//! query.insert("users", [("name", "John".into()), ("age", Value::Int(30))]);
//! query.save()?;
//!
//! let adults = QueryBuilder::new(&db)
//!     .select(["name"])
//!     .from("users")
//!     .where_op("age", ">=", 18)
//!     .order_by("name", Direction::Asc)
//!     .get()?;
//! assert_eq!(adults.len(), 1);
//! # Ok::<(), sqlwright::Error>(())
//! ```

extern crate self as sqlwright;

pub mod collection;
pub mod config;
pub mod connection;
pub mod error;
pub mod executor;
pub mod factory;
pub mod metrics;
pub mod model;
pub mod query;
pub mod raw_sql;
pub mod row;
pub mod transaction;
pub mod value;

#[cfg(test)]
mod test_helpers;

pub use collection::Collection;
pub use config::DatabaseConfig;
pub use connection::{check_connection_health, connect, validate_config};
pub use error::{Error, Result};
pub use executor::{select, Database, SqliteDatabase};
pub use factory::{BackendKind, DatabaseFactory, QueryBuilderFactory};
pub use model::ActiveRecord;
pub use query::{
    Clause, ClauseBuffer, Condition, Connector, Direction, Params, QueryBuilder, Statement,
    PARAM_MARKER,
};
pub use raw_sql::{
    execute_unprepared, execute_statement, find_all_by_statement, find_by_statement, query_value,
};
pub use row::{FromRow, Row};
pub use transaction::{Transaction, TransactionMode};
pub use value::{TryGetable, Value, ValueExtractionError, Values};

/// Derives [`FromRow`] and [`ActiveRecord`] for a struct with named fields
pub use sqlwright_derive::ActiveRecord;
