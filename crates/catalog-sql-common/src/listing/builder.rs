//! Listing statement composition

use catalog_common::database::Error;

use super::SqlFragment;
use crate::stmt::{query, Column, Statement};

/// Alias of the window column carrying the unpaginated match count
pub const TOTAL_COUNT_COLUMN: &str = "overall_count";

/// Builder for a filtered, sorted and paginated listing.
///
/// The clauses are always emitted in the same order: columns (plus the match count window) →
/// FROM → GROUP BY → filters → ORDER BY → LIMIT/OFFSET. Filters go into HAVING when the
/// statement is grouped and into WHERE otherwise, AND-ed together. The match count is the last
/// column of every row.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    columns: String,
    from: String,
    group_by: Option<String>,
    filters: Vec<SqlFragment>,
    order_by: Option<SqlFragment>,
    page: Option<SqlFragment>,
}

impl ListingQuery {
    /// Starts a listing over `from` returning `columns`
    pub fn new<C, F>(columns: C, from: F) -> Self
    where
        C: Into<String>,
        F: Into<String>,
    {
        Self {
            columns: columns.into(),
            from: from.into(),
            ..Default::default()
        }
    }

    /// Groups the rows
    pub fn group_by<G: Into<String>>(mut self, group_by: G) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// Adds a filter, when there is one
    pub fn filter(mut self, filter: Option<SqlFragment>) -> Self {
        if let Some(filter) = filter {
            self.filters.push(filter);
        }
        self
    }

    /// Sets the ORDER BY clause
    pub fn order_by(mut self, order_by: SqlFragment) -> Self {
        self.order_by = Some(order_by);
        self
    }

    /// Sets the LIMIT/OFFSET window, when there is one
    pub fn page(mut self, page: Option<SqlFragment>) -> Self {
        self.page = page;
        self
    }

    /// Renders the SQL text and collects the placeholder values in clause order
    pub fn to_sql(self) -> (String, Vec<(String, crate::value::Value)>) {
        let mut sql = format!(
            "SELECT {}, COUNT(*) OVER () AS {} FROM {}",
            self.columns, TOTAL_COUNT_COLUMN, self.from
        );
        let mut values = Vec::new();

        let filter_keyword = if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
            "HAVING"
        } else {
            "WHERE"
        };

        if !self.filters.is_empty() {
            let clauses = self
                .filters
                .iter()
                .map(|filter| filter.sql.as_str())
                .collect::<Vec<_>>();
            sql.push_str(&format!(" {} {}", filter_keyword, clauses.join(" AND ")));
            values.extend(self.filters.into_iter().flat_map(|filter| filter.values));
        }

        for fragment in [self.order_by, self.page].into_iter().flatten() {
            sql.push(' ');
            sql.push_str(&fragment.sql);
            values.extend(fragment.values);
        }

        (sql, values)
    }

    /// Builds the statement with every value bound
    pub fn build(self) -> Result<Statement, Error> {
        let (sql, values) = self.to_sql();
        Ok(query(&sql)?.bind_all(values))
    }
}

/// Match count of a listing, read from the last column of the first row.
///
/// No rows means no matches in the requested window, so the count is zero.
pub fn total_count(rows: &[Vec<Column>]) -> Result<u64, Error> {
    let Some(column) = rows.first().and_then(|row| row.last()) else {
        return Ok(0);
    };

    match column {
        Column::Integer(n) => u64::try_from(*n).map_err(|_| {
            Error::Conversion(catalog_common::ConversionError::InvalidConversion(
                n.to_string(),
                "u64".to_owned(),
            ))
        }),
        other => Err(Error::Conversion(
            catalog_common::ConversionError::InvalidType(
                "Number".to_owned(),
                format!("{:?}", other),
            ),
        )),
    }
}
