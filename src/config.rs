//! Database connection settings.
//!
//! [`DatabaseConfig`] is read from the `[database]` section of
//! `config/database.toml` (optional) overlaid by environment variables
//! prefixed `SQLWRIGHT`, e.g. `SQLWRIGHT__DATABASE__NAME=app.db`.

use crate::error::Result;
use crate::factory::BackendKind;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file, relative to the working directory
pub const CONFIG_FILE: &str = "config/database.toml";

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "SQLWRIGHT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Database name; a file path or `:memory:` for SQLite
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_name() -> String {
    ":memory:".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            name: default_name(),
            host: None,
            port: None,
            user: None,
            password: None,
        }
    }
}

impl DatabaseConfig {
    /// SQLite configuration for a file path or `:memory:`
    pub fn sqlite(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse the `backend` setting
    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.backend.parse()
    }

    /// Load from `config/database.toml`, falling back to env vars.
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from an explicit file, still overlaid by env vars.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;
        database_section(&settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// Load the database configuration from [`CONFIG_FILE`] and the environment.
///
/// An unreadable file is logged and skipped; missing settings take their
/// defaults.
pub fn load() -> Result<DatabaseConfig> {
    let builder = Config::builder()
        .add_source(File::with_name(CONFIG_FILE).required(false))
        .add_source(env_source());

    let settings = match builder.build() {
        Ok(settings) => settings,
        Err(err) => {
            if Path::new(CONFIG_FILE).exists() {
                log::warn!(
                    "Failed to load {}, falling back to environment: {}",
                    CONFIG_FILE,
                    err
                );
            }
            Config::builder()
                .add_source(env_source())
                .build()
                .map_err(|env_err| {
                    ConfigError::Message(format!(
                        "Failed to load configuration from file and env: {}, then env-only error: {}",
                        err, env_err
                    ))
                })?
        }
    };

    database_section(&settings)
}

fn database_section(settings: &Config) -> Result<DatabaseConfig> {
    match settings.get::<DatabaseConfig>("database") {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound(_)) => {
            log::debug!("No [database] settings found, using defaults");
            Ok(DatabaseConfig::default())
        }
        Err(e) => Err(ConfigError::Message(format!(
            "Database configuration could not be loaded from file or environment: {}",
            e
        ))
        .into()),
    }
}
