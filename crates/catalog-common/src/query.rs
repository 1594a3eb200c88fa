//! Listing request parameters

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort mode for product listings
///
/// Parsing never fails, unknown tokens resolve to [`SortMode::Recent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortMode {
    /// Newest products first
    #[default]
    Recent,
    /// Products with the most order lines first
    Popularity,
    /// By price, direction given by the `asc` flag
    Price,
}

impl SortMode {
    /// Resolves a sort token, falling back to the default on anything unknown
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "popularity" => Self::Popularity,
            "price" => Self::Price,
            _ => Self::Recent,
        }
    }

    /// Token name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Popularity => "popularity",
            Self::Price => "price",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SortMode {
    fn from(value: &str) -> Self {
        Self::from_token(value)
    }
}

impl From<String> for SortMode {
    fn from(value: String) -> Self {
        Self::from_token(&value)
    }
}

impl From<SortMode> for String {
    fn from(value: SortMode) -> Self {
        value.as_str().to_owned()
    }
}

/// Product listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Free text matched against title and description
    #[serde(default)]
    pub q: Option<String>,
    /// Price direction, only meaningful with [`SortMode::Price`]
    #[serde(default)]
    pub asc: Option<bool>,
    /// Page size; paging is only active together with `current_page`
    #[serde(default)]
    pub items_per_page: Option<i64>,
    /// 1-indexed page; paging is only active together with `items_per_page`
    #[serde(default)]
    pub current_page: Option<i64>,
    /// Sort mode
    #[serde(default)]
    pub sort_by: SortMode,
}

impl ProductQuery {
    /// Search term, `None` when absent or blank
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }
}
