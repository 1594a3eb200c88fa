//! Page window

use catalog_common::database::Error;

use super::SqlFragment;

/// Offset/limit window of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip
    pub offset: i64,
    /// Rows to return
    pub limit: i64,
}

impl Page {
    /// Window for a 1-indexed page of `items_per_page` rows.
    ///
    /// Paging is only active when both values are present. Values are not clamped, a page of
    /// zero or less yields a negative offset.
    pub fn from_request(items_per_page: Option<i64>, current_page: Option<i64>) -> Option<Self> {
        match (items_per_page, current_page) {
            (Some(size), Some(page)) => Some(Self {
                offset: page.saturating_sub(1).saturating_mul(size),
                limit: size,
            }),
            _ => None,
        }
    }

    /// LIMIT/OFFSET clause.
    ///
    /// SQLite would quietly read a negative offset as zero, so it is refused here instead.
    pub fn to_fragment(&self) -> Result<SqlFragment, Error> {
        if self.offset < 0 || self.limit < 0 {
            return Err(Error::InvalidPagination {
                offset: self.offset,
                limit: self.limit,
            });
        }

        Ok(SqlFragment::new("LIMIT :limit OFFSET :offset")
            .with_value("limit", self.limit)
            .with_value("offset", self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_needs_both_values() {
        assert_eq!(Page::from_request(Some(10), None), None);
        assert_eq!(Page::from_request(None, Some(3)), None);
        assert_eq!(Page::from_request(None, None), None);
    }

    #[test]
    fn third_page_of_ten_starts_at_twenty() {
        let page = Page::from_request(Some(10), Some(3)).expect("paging");
        assert_eq!(
            page,
            Page {
                offset: 20,
                limit: 10
            }
        );
        let fragment = page.to_fragment().expect("valid window");
        assert_eq!(fragment.sql, "LIMIT :limit OFFSET :offset");
        assert_eq!(fragment.values.len(), 2);
    }

    #[test]
    fn non_positive_page_is_a_fault() {
        let page = Page::from_request(Some(10), Some(0)).expect("paging");
        assert_eq!(page.offset, -10);
        assert!(matches!(
            page.to_fragment(),
            Err(Error::InvalidPagination {
                offset: -10,
                limit: 10
            })
        ));

        let page = Page::from_request(Some(-5), Some(1)).expect("paging");
        assert!(page.to_fragment().is_err());
    }

    #[test]
    fn huge_pages_do_not_overflow() {
        let page = Page::from_request(Some(i64::MAX), Some(i64::MAX)).expect("paging");
        assert_eq!(page.offset, i64::MAX);
    }
}
