//! Statements mod
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use catalog_common::database::Error;
use once_cell::sync::Lazy;

use crate::database::DatabaseExecutor;
use crate::value::Value;

/// The Column type
pub type Column = Value;

/// Expected response type for a given SQL statement
#[derive(Debug, Clone, Copy, Default)]
pub enum ExpectedSqlResponse {
    /// A single row
    SingleRow,
    /// All the rows that matches a query
    #[default]
    ManyRows,
    /// How many rows were affected by the query
    AffectedRows,
    /// Return the first column of the first row
    Pluck,
    /// Batch
    Batch,
}

/// SQL Part
#[derive(Debug, Clone)]
pub enum SqlPart {
    /// Raw SQL statement
    Raw(Arc<str>),
    /// Named placeholder and its bound value, if any
    Placeholder(Arc<str>, Option<Value>),
}

/// SQL parser error
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum SqlParseError {
    /// Invalid SQL
    #[error("Unterminated String literal")]
    UnterminatedStringLiteral,
    /// Invalid placeholder name
    #[error("Invalid placeholder name")]
    InvalidPlaceholder,
}

/// Rudimentary SQL parser.
///
/// This function does not validate the SQL statement, it only extracts the `:name` placeholders
/// so statements stay database agnostic. Colons inside string literals are left alone.
pub fn split_sql_parts(input: &str) -> Result<Vec<SqlPart>, SqlParseError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let quote = c;
                current.push(c);

                let mut closed = false;
                while let Some(next) = chars.next() {
                    current.push(next);

                    if next == quote {
                        if chars.peek() == Some(&quote) {
                            // Escaped quote (e.g. '' inside strings)
                            current.push(quote);
                            chars.next();
                        } else {
                            closed = true;
                            break;
                        }
                    }
                }

                if !closed {
                    return Err(SqlParseError::UnterminatedStringLiteral);
                }
            }
            ':' => {
                if !current.is_empty() {
                    parts.push(SqlPart::Raw(std::mem::take(&mut current).into()));
                }

                let mut name = String::new();
                while let Some(next) = chars.next_if(|n| n.is_alphanumeric() || *n == '_') {
                    name.push(next);
                }

                if name.is_empty() {
                    return Err(SqlParseError::InvalidPlaceholder);
                }

                parts.push(SqlPart::Placeholder(name.into(), None));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        parts.push(SqlPart::Raw(current.into()));
    }

    Ok(parts)
}

type Cache = HashMap<String, (Vec<SqlPart>, Option<Arc<str>>)>;

/// Sql message
#[derive(Debug, Default)]
pub struct Statement {
    cache: Arc<RwLock<Cache>>,
    cached_sql: Option<Arc<str>>,
    sql: Option<String>,
    /// The SQL statement
    pub parts: Vec<SqlPart>,
    /// The expected response type
    pub expected_response: ExpectedSqlResponse,
}

impl Statement {
    /// Creates a new statement
    fn new(sql: &str, cache: Arc<RwLock<Cache>>) -> Result<Self, SqlParseError> {
        let parsed = cache
            .read()
            .map(|cache| cache.get(sql).cloned())
            .ok()
            .flatten();

        if let Some((parts, cached_sql)) = parsed {
            Ok(Self {
                parts,
                cached_sql,
                sql: None,
                cache,
                ..Default::default()
            })
        } else {
            let parts = split_sql_parts(sql)?;

            if let Ok(mut cache) = cache.write() {
                cache.insert(sql.to_owned(), (parts.clone(), None));
            } else {
                tracing::warn!("Failed to acquire write lock for SQL statement cache");
            }

            Ok(Self {
                parts,
                sql: Some(sql.to_owned()),
                cache,
                ..Default::default()
            })
        }
    }

    /// Convert Statement into a SQL statement and the list of placeholder values
    ///
    /// Placeholders are rendered as `$1..$n` in order of appearance. A name used twice is
    /// rendered (and its value emitted) twice.
    pub fn to_sql(self) -> Result<(String, Vec<Value>), Error> {
        if let Some(cached_sql) = self.cached_sql {
            let values = self
                .parts
                .into_iter()
                .filter_map(|part| match part {
                    SqlPart::Placeholder(name, value) => {
                        Some(value.ok_or(Error::MissingPlaceholder(name.to_string())))
                    }
                    SqlPart::Raw(_) => None,
                })
                .collect::<Result<Vec<_>, Error>>()?;
            return Ok((cached_sql.to_string(), values));
        }

        let mut placeholder_values = Vec::new();
        let sql = self
            .parts
            .into_iter()
            .map(|part| match part {
                SqlPart::Placeholder(name, value) => {
                    placeholder_values.push(value.ok_or(Error::MissingPlaceholder(name.to_string()))?);
                    Ok::<_, Error>(format!("${}", placeholder_values.len()))
                }
                SqlPart::Raw(raw) => Ok(raw.trim().to_string()),
            })
            .collect::<Result<Vec<String>, _>>()?
            .join(" ");

        if let Some(original_sql) = self.sql {
            let _ = self.cache.write().map(|mut cache| {
                if let Some((_, cached_sql)) = cache.get_mut(&original_sql) {
                    *cached_sql = Some(sql.clone().into());
                }
            });
        }

        Ok((sql, placeholder_values))
    }

    /// Binds a given placeholder to a value.
    ///
    /// Every occurrence of the placeholder receives the value.
    #[inline]
    pub fn bind<C, V>(mut self, name: C, value: V) -> Self
    where
        C: AsRef<str>,
        V: Into<Value>,
    {
        let name = name.as_ref();
        let value = value.into();

        for part in self.parts.iter_mut() {
            if let SqlPart::Placeholder(part_name, part_value) = part {
                if **part_name == *name {
                    *part_value = Some(value.clone());
                }
            }
        }

        self
    }

    /// Binds every `(name, value)` pair
    pub fn bind_all<I, C>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (C, Value)>,
        C: AsRef<str>,
    {
        values
            .into_iter()
            .fold(self, |stmt, (name, value)| stmt.bind(name, value))
    }

    /// Names of placeholders that have no value yet
    pub fn unbound_placeholders(&self) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                SqlPart::Placeholder(name, None) => Some(&**name),
                _ => None,
            })
            .collect()
    }

    /// Fetches the first column of the first row
    pub async fn pluck<C>(self, conn: &C) -> Result<Option<Value>, Error>
    where
        C: DatabaseExecutor,
    {
        conn.pluck(self).await
    }

    /// Executes a batch of statements without placeholders
    pub async fn batch<C>(self, conn: &C) -> Result<(), Error>
    where
        C: DatabaseExecutor,
    {
        conn.batch(self).await
    }

    /// Executes a query and returns the affected rows
    pub async fn execute<C>(self, conn: &C) -> Result<usize, Error>
    where
        C: DatabaseExecutor,
    {
        conn.execute(self).await
    }

    /// Runs the query and returns the first row or None
    pub async fn fetch_one<C>(self, conn: &C) -> Result<Option<Vec<Column>>, Error>
    where
        C: DatabaseExecutor,
    {
        conn.fetch_one(self).await
    }

    /// Runs the query and returns every row
    pub async fn fetch_all<C>(self, conn: &C) -> Result<Vec<Vec<Column>>, Error>
    where
        C: DatabaseExecutor,
    {
        conn.fetch_all(self).await
    }
}

/// Creates a new query statement
#[inline(always)]
pub fn query(sql: &str) -> Result<Statement, Error> {
    static CACHE: Lazy<Arc<RwLock<Cache>>> = Lazy::new(|| Arc::new(RwLock::new(HashMap::new())));
    Statement::new(sql, CACHE.clone()).map_err(|e| Error::Database(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_extracted() {
        let parts = split_sql_parts("SELECT * FROM product WHERE id = :id AND title = ':x'")
            .expect("valid sql");
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[1], SqlPart::Placeholder(name, None) if &**name == "id"));
        assert!(matches!(&parts[2], SqlPart::Raw(raw) if raw.contains("':x'")));
    }

    #[test]
    fn unterminated_literal_is_rejected() {
        assert_eq!(
            split_sql_parts("SELECT 'oops").unwrap_err(),
            SqlParseError::UnterminatedStringLiteral
        );
        assert_eq!(
            split_sql_parts("SELECT : FROM x").unwrap_err(),
            SqlParseError::InvalidPlaceholder
        );
    }

    #[test]
    fn repeated_placeholder_renders_every_occurrence() {
        let (sql, values) = query("SELECT 1 WHERE a LIKE :term OR b LIKE :term LIMIT :limit")
            .expect("valid sql")
            .bind("term", "%x%")
            .bind("limit", 5i64)
            .to_sql()
            .expect("all bound");

        assert_eq!(sql, "SELECT 1 WHERE a LIKE $1 OR b LIKE $2 LIMIT $3");
        assert_eq!(
            values,
            vec![
                Value::Text("%x%".to_owned()),
                Value::Text("%x%".to_owned()),
                Value::Integer(5)
            ]
        );
    }

    #[test]
    fn missing_value_is_an_error() {
        let stmt = query("SELECT 1 WHERE id = :missing_id").expect("valid sql");
        assert_eq!(stmt.unbound_placeholders(), vec!["missing_id"]);
        assert!(matches!(
            stmt.to_sql(),
            Err(Error::MissingPlaceholder(name)) if name == "missing_id"
        ));
    }
}
