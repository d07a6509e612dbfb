//! Backend selection and builder construction.
//!
//! Factories replace global lookups: a [`DatabaseFactory`] turns a
//! [`DatabaseConfig`] into a database handle, and a [`QueryBuilderFactory`]
//! hands out builders bound to one database. Both are passed explicitly to
//! the code that needs them.

use crate::config::DatabaseConfig;
use crate::connection;
use crate::error::{Error, Result};
use crate::executor::Database;
use crate::query::QueryBuilder;
use crate::row::Row;
use std::fmt;
use std::str::FromStr;

/// Supported database engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Sqlite,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(BackendKind::Sqlite),
            other => Err(Error::InvalidConfiguration(format!(
                "Unsupported database backend: {other}"
            ))),
        }
    }
}

/// Builder kind accepted by [`QueryBuilderFactory::create_kind`]
pub const SQL_KIND: &str = "sql";

/// Creates database handles from a configuration
#[derive(Debug, Clone)]
pub struct DatabaseFactory {
    config: DatabaseConfig,
}

impl DatabaseFactory {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Factory over the configuration found in `config/database.toml` and
    /// `SQLWRIGHT__*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(crate::config::load()?))
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Open the configured backend
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an unsupported backend or
    /// an unusable configuration, or the backend error if opening fails.
    pub fn create(&self) -> Result<Box<dyn Database>> {
        match self.config.backend_kind()? {
            BackendKind::Sqlite => Ok(Box::new(connection::connect(&self.config)?)),
        }
    }

    /// Open a database of the given family; only `"sql"` is known
    pub fn create_kind(&self, kind: &str) -> Result<Box<dyn Database>> {
        match kind {
            SQL_KIND => self.create(),
            other => Err(Error::InvalidConfiguration(format!(
                "Invalid database type: {other}."
            ))),
        }
    }
}

/// Hands out query builders bound to one database
#[derive(Clone, Copy)]
pub struct QueryBuilderFactory<'db> {
    db: &'db dyn Database,
}

impl<'db> QueryBuilderFactory<'db> {
    pub fn new(db: &'db dyn Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &'db dyn Database {
        self.db
    }

    /// Fresh builder hydrating [`Row`]s
    pub fn create(&self) -> QueryBuilder<'db, Row> {
        QueryBuilder::new(self.db)
    }

    /// Fresh builder hydrating `M`
    pub fn create_for<M>(&self) -> QueryBuilder<'db, M> {
        QueryBuilder::for_model(self.db)
    }

    /// Fresh builder of the given kind; only `"sql"` is known
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for any other kind.
    pub fn create_kind(&self, kind: &str) -> Result<QueryBuilder<'db, Row>> {
        match kind {
            SQL_KIND => Ok(self.create()),
            other => Err(Error::InvalidConfiguration(format!(
                "Invalid query builder type: {other}."
            ))),
        }
    }
}

impl fmt::Debug for QueryBuilderFactory<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilderFactory")
            .field("backend", &self.db.backend())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqliteDatabase;
    use rstest::rstest;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            name: ":memory:".to_string(),
            ..DatabaseConfig::default()
        }
    }

    #[rstest]
    #[case("sqlite")]
    #[case("SQLite")]
    #[case("sqlite3")]
    fn test_backend_kind_parses(#[case] input: &str) {
        assert_eq!(input.parse::<BackendKind>().unwrap(), BackendKind::Sqlite);
    }

    #[rstest]
    fn test_unknown_backend_is_invalid_configuration() {
        let err = "mysql".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[rstest]
    fn test_database_factory_creates_sqlite() {
        let factory = DatabaseFactory::new(memory_config());
        let db = factory.create().unwrap();
        assert_eq!(db.backend(), BackendKind::Sqlite);

        let db = factory.create_kind("sql").unwrap();
        assert!(!db.in_transaction());
    }

    #[rstest]
    fn test_database_factory_rejects_unknown_kind() {
        let factory = DatabaseFactory::new(memory_config());
        let err = factory.create_kind("nosql").err().unwrap();
        assert_eq!(err.to_string(), "Invalid configuration: Invalid database type: nosql.");
    }

    #[rstest]
    fn test_database_factory_rejects_unknown_backend() {
        let factory = DatabaseFactory::new(DatabaseConfig {
            backend: "mysql".to_string(),
            ..memory_config()
        });
        assert!(matches!(factory.create(), Err(Error::InvalidConfiguration(_))));
    }

    #[rstest]
    fn test_query_builder_factory() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let factory = QueryBuilderFactory::new(&db);

        let mut first = factory.create();
        first.select(["*"]).from("users");
        let second = factory.create_kind("sql").unwrap();
        // builders never share a buffer
        assert_eq!(second.query(), "");
        assert_eq!(first.query(), "SELECT * FROM users");

        let err = factory.create_kind("nosql").err().unwrap();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Invalid query builder type: nosql."
        );
    }
}
