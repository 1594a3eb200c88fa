//! ORDER BY selection

use catalog_common::SortMode;

use super::SqlFragment;

/// Get ORDER BY direction string based on the ascending flag
pub fn order_direction(asc: bool) -> &'static str {
    if asc {
        "ASC"
    } else {
        "DESC"
    }
}

/// Exactly one ORDER BY clause from a fixed whitelist.
///
/// `asc` only matters for [`SortMode::Price`], where an absent flag means descending. Every
/// clause ends with the product id so equal keys page deterministically.
pub fn order_by(mode: SortMode, asc: Option<bool>) -> SqlFragment {
    let clause = match mode {
        SortMode::Recent => "p.date_added DESC".to_owned(),
        SortMode::Popularity => "COUNT(op.product_id) DESC".to_owned(),
        SortMode::Price => format!("p.price {}", order_direction(asc.unwrap_or(false))),
    };

    SqlFragment::new(format!("ORDER BY {}, p.id ASC", clause))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_one_clause() {
        assert_eq!(
            order_by(SortMode::Recent, Some(true)).sql,
            "ORDER BY p.date_added DESC, p.id ASC"
        );
        assert_eq!(
            order_by(SortMode::Popularity, None).sql,
            "ORDER BY COUNT(op.product_id) DESC, p.id ASC"
        );
    }

    #[test]
    fn price_direction_defaults_to_descending() {
        assert!(order_by(SortMode::Price, Some(true))
            .sql
            .starts_with("ORDER BY p.price ASC"));
        assert!(order_by(SortMode::Price, Some(false))
            .sql
            .starts_with("ORDER BY p.price DESC"));
        assert!(order_by(SortMode::Price, None)
            .sql
            .starts_with("ORDER BY p.price DESC"));
    }

    #[test]
    fn unknown_token_sorts_by_recent() {
        assert_eq!(
            order_by(SortMode::from_token("rating"), None),
            order_by(SortMode::Recent, None)
        );
    }
}
