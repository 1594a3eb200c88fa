use std::time::Instant;

use catalog_common::database::Error;

use crate::database::DatabaseExecutor;
use crate::stmt::query;
use crate::value::Value;

/// Statements slower than this are logged as a warning
pub const SLOW_QUERY_THRESHOLD_MS: u128 = 20;

/// Runs a blocking database operation, mapping its error and reporting it when it is slow
#[inline(always)]
pub fn run_db_operation_sync<F, E, E1, E2, T>(
    info: &str,
    operation: F,
    error_map: E,
) -> Result<T, E2>
where
    F: FnOnce() -> Result<T, E1>,
    E: FnOnce(E1) -> E2,
{
    let start = Instant::now();

    tracing::trace!("Running db operation {}", info);

    let result = operation().map_err(error_map);

    let duration = start.elapsed();

    if duration.as_millis() > SLOW_QUERY_THRESHOLD_MS {
        tracing::warn!("[SLOW QUERY] Took {} ms: {}", duration.as_millis(), info);
    }

    result
}

/// Applies every pending migration.
///
/// Each migration is `(driver, name, sql)`. Only migrations whose driver is empty or matches
/// `db_prefix` are considered, and applied names are recorded in the `migrations` table.
pub async fn migrate<C>(
    conn: &C,
    db_prefix: &str,
    migrations: &[(&str, &str, &str)],
) -> Result<(), Error>
where
    C: DatabaseExecutor,
{
    query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            name TEXT PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )
        "#,
    )?
    .execute(conn)
    .await?;

    for (prefix, name, sql) in migrations {
        if !prefix.is_empty() && *prefix != db_prefix {
            continue;
        }

        let is_missing = query(r#"SELECT name FROM migrations WHERE name = :name"#)?
            .bind("name", *name)
            .pluck(conn)
            .await?
            .is_none();

        if is_missing {
            tracing::info!("Applying migration {}", name);
            query(sql)?.batch(conn).await?;
            query(r#"INSERT INTO migrations (name, applied_at) VALUES (:name, :applied_at)"#)?
                .bind("name", *name)
                .bind("applied_at", Value::try_from(catalog_common::util::unix_time())?)
                .execute(conn)
                .await?;
        }
    }

    Ok(())
}
