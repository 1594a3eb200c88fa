//! Blocking pool of catalog connections
//!
//! A catalog read or write holds exactly one [`PooledResource`] from start to finish: the
//! listing statement, the joined department rows, or a keyed write together with its existence
//! check all run on that one connection. The guard goes back to the pool when it is dropped, so
//! an early `?` return never leaks a connection. Callers that cannot get a connection within the
//! configured timeout get [`Error::Timeout`], the only timeout the catalog has.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::database::DatabaseConnector;

/// Errors handing out a connection
#[derive(Debug, thiserror::Error)]
pub enum Error<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The queue lock was poisoned by a panicking holder
    #[error("Internal: PoisonError")]
    Poison,

    /// Every connection stayed borrowed for the whole wait
    #[error("Timed out waiting for a connection")]
    Timeout,

    /// The backend could not open a new connection
    #[error(transparent)]
    Resource(#[from] E),
}

/// Pool sizing, implemented by each backend's connection settings
pub trait DatabaseConfig: Clone + Debug + Send + Sync {
    /// Upper bound of connections open at once
    fn max_size(&self) -> usize;

    /// How long [`Pool::get`] waits for a connection to be returned
    fn default_timeout(&self) -> Duration;
}

/// Backend hook that opens catalog connections
pub trait DatabasePool: Debug {
    /// Connection handed to catalog operations
    type Connection: DatabaseConnector;

    /// Settings used to open a connection
    type Config: DatabaseConfig;

    /// Failure opening a connection
    type Error: Debug + std::error::Error + Send + Sync + 'static;

    /// Opens a connection.
    ///
    /// Once `stale` is set the connection is discarded the next time it would be handed out.
    fn new_resource(
        config: &Self::Config,
        stale: Arc<AtomicBool>,
        timeout: Duration,
    ) -> Result<Self::Connection, Error<Self::Error>>;

    /// Called for every connection the pool discards
    fn drop(_resource: Self::Connection) {}
}

/// Connection pool shared by every operation of one catalog database
#[derive(Debug)]
pub struct Pool<RM>
where
    RM: DatabasePool,
{
    config: RM::Config,
    queue: Mutex<Vec<(Arc<AtomicBool>, RM::Connection)>>,
    in_use: AtomicUsize,
    max_size: usize,
    default_timeout: Duration,
    waiter: Condvar,
}

/// Connection borrowed for the duration of one catalog operation
pub struct PooledResource<RM>
where
    RM: DatabasePool,
{
    resource: Option<(Arc<AtomicBool>, RM::Connection)>,
    pool: Arc<Pool<RM>>,
}

impl<RM> Debug for PooledResource<RM>
where
    RM: DatabasePool,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resource: {:?}", self.resource)
    }
}

impl<RM> Drop for PooledResource<RM>
where
    RM: DatabasePool,
{
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            match self.pool.queue.lock() {
                Ok(mut queue) => queue.push(resource),
                Err(_) => tracing::error!("Pool queue poisoned, dropping connection"),
            }
            self.pool.in_use.fetch_sub(1, Ordering::AcqRel);

            self.pool.waiter.notify_one();
        }
    }
}

impl<RM> Deref for PooledResource<RM>
where
    RM: DatabasePool,
{
    type Target = RM::Connection;

    #[allow(clippy::expect_used)]
    fn deref(&self) -> &Self::Target {
        &self.resource.as_ref().expect("resource already dropped").1
    }
}

impl<RM> DerefMut for PooledResource<RM>
where
    RM: DatabasePool,
{
    #[allow(clippy::expect_used)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.resource.as_mut().expect("resource already dropped").1
    }
}

impl<RM> Pool<RM>
where
    RM: DatabasePool,
{
    /// Creates an empty pool, connections are opened lazily
    pub fn new(config: RM::Config) -> Arc<Self> {
        Arc::new(Self {
            default_timeout: config.default_timeout(),
            max_size: config.max_size(),
            config,
            queue: Default::default(),
            in_use: Default::default(),
            waiter: Default::default(),
        })
    }

    /// Borrows a connection, waiting at most the configured timeout
    #[inline(always)]
    pub fn get(self: &Arc<Self>) -> Result<PooledResource<RM>, Error<RM::Error>> {
        self.get_timeout(self.default_timeout)
    }

    /// Connections currently borrowed
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Relaxed)
    }

    /// Borrows a connection, waiting at most `timeout`.
    ///
    /// Idle connections are reused first and stale ones discarded. A new connection is opened
    /// only while fewer than `max_size` are borrowed.
    #[inline(always)]
    pub fn get_timeout(
        self: &Arc<Self>,
        timeout: Duration,
    ) -> Result<PooledResource<RM>, Error<RM::Error>> {
        let mut resources = self.queue.lock().map_err(|_| Error::Poison)?;
        let time = Instant::now();

        loop {
            if let Some((stale, resource)) = resources.pop() {
                if !stale.load(Ordering::SeqCst) {
                    // Counted under the lock: an in-memory store must never open a second,
                    // unmigrated connection.
                    self.in_use.fetch_add(1, Ordering::AcqRel);
                    drop(resources);

                    return Ok(PooledResource {
                        resource: Some((stale, resource)),
                        pool: self.clone(),
                    });
                }

                RM::drop(resource);
                continue;
            }

            if self.in_use.load(Ordering::Relaxed) < self.max_size {
                self.in_use.fetch_add(1, Ordering::AcqRel);
                drop(resources);
                let stale: Arc<AtomicBool> = Arc::new(false.into());
                match RM::new_resource(&self.config, stale.clone(), timeout) {
                    Ok(new_resource) => {
                        return Ok(PooledResource {
                            resource: Some((stale, new_resource)),
                            pool: self.clone(),
                        });
                    }
                    Err(e) => {
                        self.in_use.fetch_sub(1, Ordering::AcqRel);
                        return Err(e);
                    }
                }
            }

            resources = self
                .waiter
                .wait_timeout(resources, timeout)
                .map_err(|_| Error::Poison)
                .and_then(|(lock, timeout_result)| {
                    if timeout_result.timed_out() {
                        tracing::warn!(
                            "Timeout waiting for the resource (pool size: {}). Waited {} ms",
                            self.max_size,
                            time.elapsed().as_millis()
                        );
                        Err(Error::Timeout)
                    } else {
                        Ok(lock)
                    }
                })?;
        }
    }
}

impl<RM> Drop for Pool<RM>
where
    RM: DatabasePool,
{
    fn drop(&mut self) {
        if let Ok(mut resources) = self.queue.lock() {
            loop {
                while let Some(resource) = resources.pop() {
                    RM::drop(resource.1);
                }

                if self.in_use.load(Ordering::Relaxed) == 0 {
                    break;
                }

                resources = if let Ok(resources) = self.waiter.wait(resources) {
                    resources
                } else {
                    break;
                };
            }
        }
    }
}
