//! Raw SQL helpers.
//!
//! For statements the builder cannot express. Each helper takes a rendered
//! [`Statement`] (SQL plus `:name` parameters) or a bare SQL string.

use crate::error::{Error, Result};
use crate::executor::Database;
use crate::query::params::marked;
use crate::query::{Params, Statement, PARAM_MARKER};
use crate::row::Row;
use crate::value::{TryGetable, Value};

/// Execute raw SQL without parameter binding
///
/// The string may hold several statements separated by `;`.
///
/// # Examples
///
/// ```
/// use sqlwright::{execute_unprepared, SqliteDatabase};
///
/// let db = SqliteDatabase::open_in_memory()?;
/// execute_unprepared(&db, "CREATE TABLE t (id INTEGER PRIMARY KEY); INSERT INTO t DEFAULT VALUES")?;
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub fn execute_unprepared<D: Database + ?Sized>(db: &D, sql: &str) -> Result<()> {
    db.execute_batch(sql)
}

/// Execute a parameterized statement and return the number of rows affected
pub fn execute_statement<D: Database + ?Sized>(db: &D, statement: &Statement) -> Result<u64> {
    db.execute(&statement.sql, &statement.params)
}

/// Execute a query that must return exactly one row
///
/// # Errors
///
/// Returns [`Error::RecordNotFound`] when no row matches and
/// [`Error::TooManyRows`] when more than one does.
pub fn find_by_statement<D: Database + ?Sized>(db: &D, statement: &Statement) -> Result<Row> {
    let mut rows = db.select_rows(&statement.sql, &statement.params)?;
    match rows.len() {
        0 => Err(Error::RecordNotFound),
        1 => Ok(rows.remove(0)),
        n => Err(Error::TooManyRows(n)),
    }
}

/// Execute a query and return all rows
pub fn find_all_by_statement<D: Database + ?Sized>(db: &D, statement: &Statement) -> Result<Vec<Row>> {
    db.select_rows(&statement.sql, &statement.params)
}

/// Execute a query and extract the first column of its single row
///
/// # Examples
///
/// ```
/// use sqlwright::{query_value, SqliteDatabase, Statement};
///
/// let db = SqliteDatabase::open_in_memory()?;
/// let answer: i64 = query_value(&db, &Statement::raw("SELECT 6 * 7"))?;
/// assert_eq!(answer, 42);
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub fn query_value<T, D>(db: &D, statement: &Statement) -> Result<T>
where
    T: TryGetable,
    D: Database + ?Sized,
{
    let row = find_by_statement(db, statement)?;
    let (column, value) = row
        .into_map()
        .into_iter()
        .next()
        .ok_or_else(|| Error::ColumnNotFound("0".to_string()))?;
    T::try_get(value).map_err(|source| Error::InvalidValue { column, source })
}

/// Statement from SQL and `(name, value)` pairs; names get the `:` marker
pub fn statement<I, K, V>(sql: &str, params: I) -> Statement
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<Value>,
{
    let params: Params = params
        .into_iter()
        .map(|(name, value)| {
            let name = name.as_ref();
            let name = if name.starts_with(PARAM_MARKER) {
                name.to_string()
            } else {
                marked(name)
            };
            (name, value.into())
        })
        .collect();
    Statement::new(sql, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::seeded_tests_db;

    #[test]
    fn test_find_by_statement_single_row() {
        let db = seeded_tests_db();
        let row = find_by_statement(
            &db,
            &statement("SELECT * FROM tests WHERE id = :id", [("id", 2)]),
        )
        .unwrap();
        assert_eq!(row.get("name"), Some(&Value::Text("test2".into())));
    }

    #[test]
    fn test_find_by_statement_no_rows() {
        let db = seeded_tests_db();
        let err = find_by_statement(
            &db,
            &statement("SELECT * FROM tests WHERE id = :id", [(":id", 99)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::RecordNotFound));
    }

    #[test]
    fn test_find_by_statement_too_many_rows() {
        let db = seeded_tests_db();
        let err = find_by_statement(&db, &Statement::raw("SELECT * FROM tests")).unwrap_err();
        assert!(matches!(err, Error::TooManyRows(3)));
    }

    #[test]
    fn test_execute_statement_and_find_all() {
        let db = seeded_tests_db();
        let affected = execute_statement(
            &db,
            &statement("DELETE FROM tests WHERE id > :id", [("id", 1)]),
        )
        .unwrap();
        assert_eq!(affected, 2);
        let rows = find_all_by_statement(&db, &Statement::raw("SELECT * FROM tests")).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_query_value() {
        let db = seeded_tests_db();
        let count: i64 = query_value(&db, &Statement::raw("SELECT COUNT(*) FROM tests")).unwrap();
        assert_eq!(count, 3);

        let name: Option<String> = query_value(
            &db,
            &statement("SELECT name FROM tests WHERE id = :id", [("id", 1)]),
        )
        .unwrap();
        assert_eq!(name.as_deref(), Some("test1"));
    }

    #[test]
    fn test_query_value_type_mismatch_names_column() {
        let db = seeded_tests_db();
        let err = query_value::<i64, _>(
            &db,
            &statement("SELECT name FROM tests WHERE id = :id", [("id", 1)]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref column, .. } if column == "name"));
    }
}
