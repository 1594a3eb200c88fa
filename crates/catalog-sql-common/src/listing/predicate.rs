//! Free text search predicate

use super::SqlFragment;

/// Placeholder carrying the `%term%` pattern
pub const SEARCH_PLACEHOLDER: &str = "search";

/// Escapes the LIKE wildcards in a user supplied term, `\` being the escape character
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case insensitive substring match against title OR description.
///
/// A missing or blank term yields no predicate at all. The OR pair is parenthesised so it can be
/// AND-ed with any other filter.
///
/// The term is lowercased in Rust with full Unicode rules, the columns with the store's `LOWER`.
/// SQLite's `LOWER` only folds ASCII: a row titled `éclair` is found by `ÉCLAIR`, but a row
/// titled `ÉCLAIR` is not found by any spelling of the term.
pub fn search_predicate(term: Option<&str>) -> Option<SqlFragment> {
    let term = term.filter(|term| !term.trim().is_empty())?;

    Some(
        SqlFragment::new(
            r#"(LOWER(p.title) LIKE :search ESCAPE '\' OR LOWER(p.description) LIKE :search ESCAPE '\')"#,
        )
        .with_value(
            SEARCH_PLACEHOLDER,
            format!("%{}%", escape_like(&term.to_lowercase())),
        ),
    )
}
