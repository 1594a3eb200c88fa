//! SQLite storage backend for the catalog

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

mod async_sqlite;
mod common;
pub mod memory;

pub use async_sqlite::AsyncSqlite;
pub use catalog_sql_common::SQLCatalogDatabase;
pub use common::{Config, SqliteConnectionManager, DEFAULT_MAX_SIZE, DEFAULT_TIMEOUT};

/// Catalog SQLite implementation with rusqlite
pub type CatalogSqliteDatabase = SQLCatalogDatabase<SqliteConnectionManager>;

#[cfg(test)]
mod test {
    use catalog_common::catalog_db_test;

    use super::*;

    async fn provide_db() -> CatalogSqliteDatabase {
        memory::empty().await.unwrap()
    }

    catalog_db_test!(provide_db);
}
