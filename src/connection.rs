//! Connection establishment and health checks.
//!
//! [`connect`] validates a [`DatabaseConfig`] and opens the configured
//! backend. [`check_connection_health`] runs `SELECT 1` against any
//! [`Database`].

use crate::config::DatabaseConfig;
use crate::error::{Error, Result};
use crate::executor::{Database, SqliteDatabase};
use crate::factory::BackendKind;
use crate::query::Params;
use std::time::Instant;

/// Opens the database described by `config`
///
/// # Arguments
///
/// * `config` - Connection settings; for SQLite `name` is a file path or `:memory:`
///
/// # Returns
///
/// Returns an open [`SqliteDatabase`] on success.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] if the configuration is unusable,
/// or [`Error::Sqlite`] if the database cannot be opened.
///
/// # Examples
///
/// ```
/// use sqlwright::{connect, DatabaseConfig};
///
/// let db = connect(&DatabaseConfig::sqlite(":memory:"))?;
/// assert!(sqlwright::check_connection_health(&db)?);
/// # Ok::<(), sqlwright::Error>(())
/// ```
pub fn connect(config: &DatabaseConfig) -> Result<SqliteDatabase> {
    let start = Instant::now();

    validate_config(config)?;
    let db = SqliteDatabase::open(&config.name)?;

    log::debug!(
        "Connected to {} database {} in {:?}",
        config.backend,
        config.name,
        start.elapsed()
    );
    Ok(db)
}

/// Validates a configuration before connecting
///
/// # Supported Backends
///
/// - `sqlite`: `name` must be non-empty; host, port, user and password are ignored
pub fn validate_config(config: &DatabaseConfig) -> Result<()> {
    match config.backend_kind()? {
        BackendKind::Sqlite => {
            if config.name.trim().is_empty() {
                return Err(Error::InvalidConfiguration(
                    "Database name cannot be empty".to_string(),
                ));
            }
            if config.host.is_some() || config.user.is_some() {
                log::debug!("SQLite ignores host and user settings");
            }
        }
    }
    Ok(())
}

/// Check whether the database answers a trivial query
///
/// Returns `Ok(true)` when `SELECT 1` yields exactly one row.
pub fn check_connection_health(db: &dyn Database) -> Result<bool> {
    let rows = db.select_rows("SELECT 1 AS ok", &Params::new())?;
    Ok(rows.len() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_in_memory() {
        let db = connect(&DatabaseConfig::default()).unwrap();
        assert!(check_connection_health(&db).unwrap());
    }

    #[test]
    fn test_connect_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");
        let db = connect(&DatabaseConfig::sqlite(path.to_string_lossy())).unwrap();
        assert!(check_connection_health(&db).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_validate_config_rejects_empty_name() {
        let err = validate_config(&DatabaseConfig::sqlite("  ")).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_config_rejects_unknown_backend() {
        let config = DatabaseConfig {
            backend: "oracle".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(Error::InvalidConfiguration(_))
        ));
    }
}
