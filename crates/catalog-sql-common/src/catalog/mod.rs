//! SQL database implementation of the catalog
//!
//! This is a generic SQL implementation of the catalog storage traits. Any database can be
//! plugged in through [`DatabasePool`] as long as it understands standard SQL plus window
//! functions.
//!
//! Keyed updates and deletes run inside a transaction together with the existence probe that
//! classifies their outcome, so a concurrent insert or delete cannot slip between the write and
//! the probe.
use std::fmt::Debug;
use std::sync::Arc;

use catalog_common::database::Error;
use catalog_common::{EntityId, WriteOutcome};
use migrations::MIGRATIONS;

use crate::common::migrate;
use crate::database::{ConnectionWithTransaction, DatabaseExecutor};
use crate::pool::{DatabasePool, Pool, PooledResource};
use crate::stmt::{query, Statement};

mod departments;
mod employees;
mod migrations;
mod products;

/// Catalog SQL Database
#[derive(Debug, Clone)]
pub struct SQLCatalogDatabase<RM>
where
    RM: DatabasePool + 'static,
{
    pool: Arc<Pool<RM>>,
}

/// Tables that accept keyed writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// `department`
    Department,
    /// `product`
    Product,
}

impl Table {
    /// Entity name used in messages
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Product => "product",
        }
    }

    fn exists_sql(&self) -> &'static str {
        match self {
            Self::Department => r#"SELECT 1 FROM department WHERE id = :id"#,
            Self::Product => r#"SELECT 1 FROM product WHERE id = :id"#,
        }
    }
}

/// Whether a row with `id` exists in `table`
pub async fn exists<C>(conn: &C, table: Table, id: EntityId) -> Result<bool, Error>
where
    C: DatabaseExecutor,
{
    Ok(query(table.exists_sql())?
        .bind("id", id)
        .pluck(conn)
        .await?
        .is_some())
}

impl<RM> SQLCatalogDatabase<RM>
where
    RM: DatabasePool + 'static,
{
    /// Creates a new instance
    pub async fn new<X>(db: X) -> Result<Self, Error>
    where
        X: Into<RM::Config>,
    {
        let pool = Pool::new(db.into());

        Self::migrate(pool.get().map_err(|e| Error::Database(Box::new(e)))?).await?;

        Ok(Self { pool })
    }

    /// Migrate
    async fn migrate(conn: PooledResource<RM>) -> Result<(), Error> {
        let tx = ConnectionWithTransaction::new(conn).await?;
        migrate(&tx, RM::Connection::name(), MIGRATIONS).await?;
        tx.commit().await?;
        Ok(())
    }

    #[inline(always)]
    fn conn(&self) -> Result<PooledResource<RM>, Error> {
        self.pool.get().map_err(|e| Error::Database(Box::new(e)))
    }

    /// Runs a keyed update or delete and classifies what happened.
    ///
    /// Rows affected means [`WriteOutcome::Applied`]. Otherwise the key is probed on the same
    /// transaction: an absent key is [`WriteOutcome::NotFound`], while a present key returns the
    /// original fault, or [`Error::NoRowsAffected`] when there was none. Only an applied write is
    /// committed.
    async fn guarded_write(
        &self,
        table: Table,
        id: EntityId,
        statement: Statement,
    ) -> Result<WriteOutcome, Error> {
        let tx = ConnectionWithTransaction::new(self.conn()?).await?;

        let outcome = match statement.execute(&tx).await {
            Ok(affected) if affected > 0 => Ok(WriteOutcome::Applied),
            Ok(_) => match exists(&tx, table, id).await {
                Ok(true) => {
                    tracing::warn!("{} {} exists but no rows were affected", table.entity(), id);
                    Err(Error::NoRowsAffected)
                }
                Ok(false) => Ok(WriteOutcome::NotFound),
                Err(err) => Err(err),
            },
            Err(err) => match exists(&tx, table, id).await {
                Ok(false) => Ok(WriteOutcome::NotFound),
                Ok(true) => Err(err),
                Err(probe_err) => {
                    tracing::error!("Existence probe failed after a write fault: {}", probe_err);
                    Err(err)
                }
            },
        };

        if matches!(outcome, Ok(WriteOutcome::Applied)) {
            tx.commit().await?;
        } else if let Err(err) = tx.rollback().await {
            tracing::error!("Failed to rollback {} write: {}", table.entity(), err);
        }

        outcome
    }
}
