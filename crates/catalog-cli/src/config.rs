//! CLI settings, derived from `config.toml` and the environment

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use catalog_sqlite::{DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT};
use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

pub const ENV_DATABASE_PATH: &str = "CATALOG_DATABASE_PATH";
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "CATALOG_DATABASE_MAX_CONNECTIONS";
pub const ENV_DATABASE_CONNECTION_TIMEOUT: &str = "CATALOG_DATABASE_CONNECTION_TIMEOUT_SECONDS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    /// SQLite file, defaults to `catalog.sqlite` in the work dir
    pub path: Option<String>,
    pub max_connections: usize,
    pub connection_timeout_seconds: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            path: None,
            max_connections: DEFAULT_MAX_SIZE,
            connection_timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Database {
    pub fn from_env(mut self) -> Self {
        if let Ok(path) = env::var(ENV_DATABASE_PATH) {
            self.path = Some(path);
        }

        if let Ok(max_connections) = env::var(ENV_DATABASE_MAX_CONNECTIONS) {
            if let Ok(parsed) = max_connections.parse::<usize>() {
                self.max_connections = parsed;
            }
        }

        if let Ok(timeout) = env::var(ENV_DATABASE_CONNECTION_TIMEOUT) {
            if let Ok(parsed) = timeout.parse::<u64>() {
                self.connection_timeout_seconds = parsed;
            }
        }

        self
    }

    /// Pool configuration, `path` being used when no database path is configured
    pub fn pool_config(&self, path: PathBuf) -> catalog_sqlite::Config {
        catalog_sqlite::Config {
            path: self
                .path
                .clone()
                .unwrap_or_else(|| path.to_string_lossy().to_string()),
            max_size: self.max_connections,
            timeout: Duration::from_secs(self.connection_timeout_seconds),
        }
    }
}

/// Catalog CLI settings, derived from `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    #[must_use]
    pub fn new<P>(config_file_name: P) -> Self
    where
        P: Into<PathBuf>,
    {
        let default_settings = Self::default();
        // attempt to construct settings with file
        let from_file = Self::new_from_default(&default_settings, config_file_name);
        match from_file {
            Ok(f) => f,
            Err(e) => {
                tracing::error!(
                    "Error reading config file, falling back to defaults. Error: {e:?}"
                );
                default_settings
            }
        }
    }

    fn new_from_default<P>(default: &Settings, config_file_name: P) -> Result<Self, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let config = config_file_name.into().to_string_lossy().to_string();

        let config: Config = Config::builder()
            // use defaults
            .add_source(Config::try_from(default)?)
            // override with file contents, when there is a file
            .add_source(File::with_name(&config).required(false))
            .build()?;

        config.try_deserialize()
    }

    /// Applies the environment overrides
    pub fn from_env(mut self) -> Self {
        self.database = self.database.from_env();
        self
    }
}
