//! Database abstraction and the SQLite backend.
//!
//! [`Database`] is the seam between the query builder and a concrete engine.
//! It is object safe; builders hold a `&dyn Database`. [`SqliteDatabase`] is
//! the one implementation, built on `rusqlite` with named `:param` binding.

use crate::collection::Collection;
use crate::error::Result;
use crate::factory::BackendKind;
use crate::query::Params;
use crate::row::{FromRow, Row};
use crate::value::Value;
use rusqlite::types::ToSql;
use rusqlite::Connection;
use std::fmt;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Path that opens a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Trait for executing statements against a database
///
/// Parameters are passed by name: every key of [`Params`] carries its `:`
/// marker and must appear in the statement.
///
/// # Examples
///
/// ```
/// use sqlwright::{Database, Params, SqliteDatabase, Value};
///
/// let db = SqliteDatabase::open_in_memory()?;
/// db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")?;
///
/// let mut params = Params::new();
/// params.insert(":name".to_string(), Value::from("John"));
/// let affected = db.execute("INSERT INTO users (name) VALUES (:name)", &params)?;
/// assert_eq!(affected, 1);
///
/// let rows = db.select_rows("SELECT id, name FROM users", &Params::new())?;
/// assert_eq!(rows[0].try_get::<String>("name")?, "John");
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub trait Database {
    /// Execute a statement and return the number of rows affected
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumnOrTable`](crate::Error::MissingColumnOrTable)
    /// when the statement names an unknown table or column, and
    /// [`Error::Sqlite`](crate::Error::Sqlite) for any other backend failure.
    fn execute(&self, sql: &str, params: &Params) -> Result<u64>;

    /// Execute one or more statements without parameters
    fn execute_batch(&self, sql: &str) -> Result<()>;

    /// Execute a query and return every row in result order
    fn select_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>>;

    /// Number of rows a query yields
    fn row_count(&self, sql: &str, params: &Params) -> Result<usize> {
        Ok(self.select_rows(sql, params)?.len())
    }

    /// Row id generated by the most recent successful insert
    fn last_insert_id(&self) -> Result<i64>;

    fn begin_transaction(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    /// Whether a transaction is currently open
    fn in_transaction(&self) -> bool;

    fn backend(&self) -> BackendKind;
}

/// Execute a query and hydrate every row as `M`
///
/// # Errors
///
/// Returns the database error unchanged, or the first hydration error.
pub fn select<M: FromRow>(db: &dyn Database, sql: &str, params: &Params) -> Result<Collection<M>> {
    db.select_rows(sql, params)?
        .iter()
        .map(M::from_row)
        .collect()
}

/// SQLite backend
///
/// Opened on a file path or on `:memory:`. Every statement is logged at
/// debug level and counted in [`METRICS`](crate::metrics::METRICS).
pub struct SqliteDatabase {
    conn: Connection,
    path: String,
}

impl SqliteDatabase {
    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`](crate::Error::Sqlite) if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_string_lossy().into_owned();

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::open_database_span(&path).entered();

        let conn = if path == MEMORY_PATH {
            Connection::open_in_memory()?
        } else {
            Connection::open(&path)?
        };
        log::debug!("Opened SQLite database at {}", path);
        Ok(Self { conn, path })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::open(MEMORY_PATH)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consume the database and return the underlying connection
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    fn instrumented<T>(
        &self,
        sql: &str,
        params: &Params,
        run: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql).entered();

        log::debug!("Executing: {} {:?}", sql, params);
        let start = Instant::now();
        let result = run(&self.conn).map_err(|e| {
            #[cfg(feature = "metrics")]
            METRICS.record_query_error();
            log::debug!("Statement failed: {}", e);
            crate::Error::from(e)
        });

        let duration = start.elapsed();
        #[cfg(feature = "metrics")]
        METRICS.record_query(duration);
        log::trace!("Statement finished in {:?}", duration);

        result
    }
}

fn bind(params: &Params) -> Vec<(&str, &dyn ToSql)> {
    params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect()
}

impl Database for SqliteDatabase {
    fn execute(&self, sql: &str, params: &Params) -> Result<u64> {
        self.instrumented(sql, params, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let affected = stmt.execute(bind(params).as_slice())?;
            Ok(affected as u64)
        })
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        self.instrumented(sql, &Params::new(), |conn| conn.execute_batch(sql))
    }

    fn select_rows(&self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        self.instrumented(sql, params, |conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(String::from)
                .collect();

            let mut rows = stmt.query(bind(params).as_slice())?;
            let mut records = Vec::new();
            while let Some(row) = rows.next()? {
                let mut record = Row::new();
                for (index, column) in columns.iter().enumerate() {
                    record.insert(column.clone(), Value::from(row.get_ref(index)?));
                }
                records.push(record);
            }
            Ok(records)
        })
    }

    fn last_insert_id(&self) -> Result<i64> {
        Ok(self.conn.last_insert_rowid())
    }

    fn begin_transaction(&self) -> Result<()> {
        self.execute_batch("BEGIN")
    }

    fn commit(&self) -> Result<()> {
        self.execute_batch("COMMIT")
    }

    fn rollback(&self) -> Result<()> {
        self.execute_batch("ROLLBACK")
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Sqlite
    }
}

impl fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("path", &self.path)
            .field("in_transaction", &self.in_transaction())
            .finish()
    }
}
