//! Executor, transaction and connector traits a catalog backend implements
//!
//! Reads run directly on a pooled connection. Keyed writes wrap the same connection in a
//! [`ConnectionWithTransaction`] so the write and the follow-up existence check see one
//! consistent snapshot.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use catalog_common::database::Error;

use crate::stmt::{Column, Statement};

/// Runs catalog statements
#[async_trait::async_trait]
pub trait DatabaseExecutor: Debug + Sync + Send {
    /// Driver name, used to pick the migrations for the backend
    fn name() -> &'static str;

    /// Executes a query and returns the affected rows
    async fn execute(&self, statement: Statement) -> Result<usize, Error>;

    /// Runs the query and returns the first row or None
    async fn fetch_one(&self, statement: Statement) -> Result<Option<Vec<Column>>, Error>;

    /// Runs the query and returns every row, in cursor order
    async fn fetch_all(&self, statement: Statement) -> Result<Vec<Vec<Column>>, Error>;

    /// Fetches the first row and column from a query
    async fn pluck(&self, statement: Statement) -> Result<Option<Column>, Error>;

    /// Runs several `;` separated statements, used by migrations
    async fn batch(&self, statement: Statement) -> Result<(), Error>;
}

/// Transaction statements of a backend
#[async_trait::async_trait]
pub trait DatabaseTransaction<DB>
where
    DB: DatabaseExecutor,
{
    /// Makes the transaction's writes durable
    async fn commit(conn: &mut DB) -> Result<(), Error>;

    /// Opens a transaction
    async fn begin(conn: &mut DB) -> Result<(), Error>;

    /// Discards the transaction's writes
    async fn rollback(conn: &mut DB) -> Result<(), Error>;
}

/// Pooled connection with an open transaction
///
/// Finish it with [`ConnectionWithTransaction::commit`] or
/// [`ConnectionWithTransaction::rollback`]. Dropping it unfinished spawns the rollback on the
/// runtime and only then returns the connection, so a caller that needs the same connection
/// right away (a single connection in-memory pool) must finish explicitly.
#[derive(Debug)]
pub struct ConnectionWithTransaction<DB, W>
where
    DB: DatabaseConnector + 'static,
    W: Debug + Deref<Target = DB> + DerefMut<Target = DB> + Send + Sync + 'static,
{
    inner: Option<W>,
}

impl<DB, W> ConnectionWithTransaction<DB, W>
where
    DB: DatabaseConnector,
    W: Debug + Deref<Target = DB> + DerefMut<Target = DB> + Send + Sync + 'static,
{
    /// Begins a transaction on `inner`
    pub async fn new(mut inner: W) -> Result<Self, Error> {
        DB::Transaction::begin(inner.deref_mut()).await?;
        Ok(Self { inner: Some(inner) })
    }

    /// Commits and returns the connection to the pool
    pub async fn commit(mut self) -> Result<(), Error> {
        let mut conn = self.finish()?;
        DB::Transaction::commit(&mut conn).await
    }

    /// Rolls back and returns the connection to the pool
    pub async fn rollback(mut self) -> Result<(), Error> {
        let mut conn = self.finish()?;
        DB::Transaction::rollback(&mut conn).await
    }

    fn finish(&mut self) -> Result<W, Error> {
        self.inner.take().ok_or_else(Self::finished)
    }

    fn connection(&self) -> Result<&W, Error> {
        self.inner.as_ref().ok_or_else(Self::finished)
    }

    fn finished() -> Error {
        Error::Internal("Transaction already finished".to_owned())
    }
}

impl<DB, W> Drop for ConnectionWithTransaction<DB, W>
where
    DB: DatabaseConnector,
    W: Debug + Deref<Target = DB> + DerefMut<Target = DB> + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(mut conn) = self.inner.take() {
            tokio::spawn(async move {
                if let Err(err) = DB::Transaction::rollback(conn.deref_mut()).await {
                    tracing::error!("Failed to rollback dropped transaction: {}", err);
                }
            });
        }
    }
}

#[async_trait::async_trait]
impl<DB, W> DatabaseExecutor for ConnectionWithTransaction<DB, W>
where
    DB: DatabaseConnector,
    W: Debug + Deref<Target = DB> + DerefMut<Target = DB> + Send + Sync + 'static,
{
    fn name() -> &'static str {
        "Transaction"
    }

    async fn execute(&self, statement: Statement) -> Result<usize, Error> {
        self.connection()?.execute(statement).await
    }

    async fn fetch_one(&self, statement: Statement) -> Result<Option<Vec<Column>>, Error> {
        self.connection()?.fetch_one(statement).await
    }

    async fn fetch_all(&self, statement: Statement) -> Result<Vec<Vec<Column>>, Error> {
        self.connection()?.fetch_all(statement).await
    }

    async fn pluck(&self, statement: Statement) -> Result<Option<Column>, Error> {
        self.connection()?.pluck(statement).await
    }

    async fn batch(&self, statement: Statement) -> Result<(), Error> {
        self.connection()?.batch(statement).await
    }
}

/// Connection type a backend pools
pub trait DatabaseConnector: Debug + DatabaseExecutor + Send + Sync {
    /// How the backend begins, commits and rolls back
    type Transaction: DatabaseTransaction<Self>
    where
        Self: Sized;
}
