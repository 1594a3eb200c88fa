use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use catalog_sql_common::pool::{self, DatabaseConfig, DatabasePool};
use catalog_sql_common::value::Value;
use rusqlite::Connection;

use crate::async_sqlite::AsyncSqlite;

/// Pool size used when nothing else is configured
pub const DEFAULT_MAX_SIZE: usize = 20;

/// Connection timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite connection configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Database file, or `:memory:`
    pub path: String,
    /// Maximum number of pooled connections
    pub max_size: usize,
    /// How long to wait for a free connection, also used as the busy timeout
    pub timeout: Duration,
}

impl Config {
    /// Whether the database lives in memory
    pub fn is_memory(&self) -> bool {
        self.path.contains(":memory:")
    }
}

impl DatabaseConfig for Config {
    fn max_size(&self) -> usize {
        // Every in-memory connection is its own database
        if self.is_memory() {
            1
        } else {
            self.max_size
        }
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }
}

impl From<&str> for Config {
    fn from(path: &str) -> Self {
        Config {
            path: path.to_owned(),
            max_size: DEFAULT_MAX_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl From<PathBuf> for Config {
    fn from(path: PathBuf) -> Self {
        path.to_string_lossy().as_ref().into()
    }
}

impl From<&PathBuf> for Config {
    fn from(path: &PathBuf) -> Self {
        path.to_string_lossy().as_ref().into()
    }
}

/// SQLite connection manager
#[derive(Debug)]
pub struct SqliteConnectionManager;

impl DatabasePool for SqliteConnectionManager {
    type Config = Config;

    type Connection = AsyncSqlite;

    type Error = rusqlite::Error;

    fn new_resource(
        config: &Self::Config,
        _stale: Arc<AtomicBool>,
        _timeout: Duration,
    ) -> Result<Self::Connection, pool::Error<Self::Error>> {
        Ok(AsyncSqlite::new(create_sqlite_connection(config)?))
    }
}

/// Opens a rusqlite connection with the catalog pragmas applied
pub fn create_sqlite_connection(config: &Config) -> Result<Connection, rusqlite::Error> {
    let conn = if config.is_memory() {
        Connection::open_in_memory()?
    } else {
        Connection::open(&config.path)?
    };

    tracing::debug!("Opened sqlite connection to {}", config.path);

    // Apply pragmas
    conn.pragma_update(
        None,
        "busy_timeout",
        i64::try_from(config.timeout.as_millis()).unwrap_or(i64::MAX),
    )?;
    conn.pragma_update(None, "journal_mode", "wal")?;
    conn.pragma_update(None, "synchronous", "normal")?;
    conn.pragma_update(None, "temp_store", "memory")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    Ok(conn)
}

/// Convert Value to rusqlite Value
#[inline(always)]
pub fn to_sqlite(v: Value) -> rusqlite::types::Value {
    match v {
        Value::Blob(blob) => rusqlite::types::Value::Blob(blob),
        Value::Integer(i) => rusqlite::types::Value::Integer(i),
        Value::Null => rusqlite::types::Value::Null,
        Value::Text(t) => rusqlite::types::Value::Text(t),
        Value::Real(r) => rusqlite::types::Value::Real(r),
    }
}

/// Convert from rusqlite Value
#[inline(always)]
pub fn from_sqlite(v: rusqlite::types::Value) -> Value {
    match v {
        rusqlite::types::Value::Blob(blob) => Value::Blob(blob),
        rusqlite::types::Value::Integer(i) => Value::Integer(i),
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Text(t) => Value::Text(t),
        rusqlite::types::Value::Real(r) => Value::Real(r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pool_has_one_connection() {
        let config = Config::from(":memory:");
        assert_eq!(config.max_size(), 1);

        let config = Config::from("/tmp/catalog.sqlite");
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(config.default_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = create_sqlite_connection(&Config::from(":memory:")).expect("connection");
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .expect("pragma");
        assert_eq!(enabled, 1);
    }

    #[test]
    fn borrowed_connection_is_returned_on_drop() {
        let connections = pool::Pool::<SqliteConnectionManager>::new(Config {
            path: ":memory:".to_owned(),
            max_size: DEFAULT_MAX_SIZE,
            timeout: Duration::from_millis(50),
        });

        let conn = connections.get().expect("first connection");
        assert_eq!(connections.in_use(), 1);

        // The in-memory store has a single connection, a second borrower has to wait
        assert!(matches!(connections.get(), Err(pool::Error::Timeout)));

        drop(conn);
        assert_eq!(connections.in_use(), 0);

        let again = connections.get().expect("returned connection");
        assert_eq!(connections.in_use(), 1);
        drop(again);
    }
}
