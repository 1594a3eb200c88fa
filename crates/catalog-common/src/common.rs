//! Response shapes shared by every backend

use serde::{Deserialize, Serialize};

/// Response metadata key carrying [`Listing::total_count`]
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// A page of entities plus the number of matches before pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing<T> {
    /// Entities in the requested window
    pub items: Vec<T>,
    /// Rows matching the filter, regardless of the requested page
    pub total_count: u64,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// A freshly created entity and where it can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created<T> {
    /// The entity, including its store assigned id
    pub entity: T,
    /// Location of the single entity fetch
    pub location: String,
}

/// Outcome of an update or delete keyed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row was written
    Applied,
    /// No row exists with the requested id
    NotFound,
}
