//! Generic SQL storage backend for the catalog
//!
//! Any database speaking standard SQL with window functions can be plugged in by implementing
//! [`pool::DatabasePool`] and [`database::DatabaseExecutor`].

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

mod catalog;
mod common;
pub mod database;
pub mod flatten;
pub mod listing;
mod macros;
pub mod pool;
pub mod stmt;
pub mod value;

pub use catalog::SQLCatalogDatabase;
pub use catalog_common::database::ConversionError;
pub use common::{migrate, run_db_operation_sync, SLOW_QUERY_THRESHOLD_MS};
