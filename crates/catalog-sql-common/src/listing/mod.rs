//! Listing engine
//!
//! A listing statement is assembled from small [`SqlFragment`] values: an optional search
//! predicate, exactly one ORDER BY and an optional LIMIT/OFFSET window. Every value a fragment
//! needs travels as a named placeholder, never as SQL text.

pub mod builder;
pub mod pagination;
pub mod predicate;
pub mod sort;

pub use builder::{total_count, ListingQuery, TOTAL_COUNT_COLUMN};
pub use pagination::Page;
pub use predicate::search_predicate;
pub use sort::order_by;

use crate::value::Value;

/// A piece of SQL plus the named values its placeholders bind to
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    /// SQL text with `:name` placeholders
    pub sql: String,
    /// Values for the placeholders in `sql`
    pub values: Vec<(String, Value)>,
}

impl SqlFragment {
    /// A fragment without placeholders
    pub fn new<S: Into<String>>(sql: S) -> Self {
        Self {
            sql: sql.into(),
            values: Vec::new(),
        }
    }

    /// Adds a placeholder value
    pub fn with_value<N, V>(mut self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        self.values.push((name.into(), value.into()));
        self
    }
}
