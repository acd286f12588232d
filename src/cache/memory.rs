//! Memory Cache Module
//!
//! Owning handle that ties an `EntryStore` to its optional sweeper task.

use std::ops::Deref;
use std::sync::Arc;

use tracing::info;

use crate::cache::EntryStore;
use crate::config::Config;
use crate::error::Result;
use crate::tasks::{spawn_sweeper, Sweeper};

// == Memory Cache ==
/// An in-memory cache with an optional background expiration sweeper.
///
/// Dereferences to [`EntryStore`], so all cache operations are called on the
/// cache directly. Call [`MemoryCache::shutdown`] to stop the sweeper and
/// wait for it; dropping the cache stops it without waiting.
#[derive(Debug)]
pub struct MemoryCache<V> {
    store: Arc<EntryStore<V>>,
    sweeper: Option<Sweeper>,
}

impl<V> MemoryCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache, starting the sweeper when `expire` is true.
    ///
    /// # Errors
    /// Returns `CacheError::NoRuntime` if `expire` is true and no tokio
    /// runtime is running.
    pub fn new(expire: bool) -> Result<Self> {
        Self::with_config(&Config {
            expire,
            ..Config::default()
        })
    }

    /// Creates a cache from an explicit configuration.
    pub fn with_config(config: &Config) -> Result<Self> {
        let store = Arc::new(EntryStore::new());
        let sweeper = if config.expire {
            Some(spawn_sweeper(&store, config.effective_tick_interval())?)
        } else {
            None
        };

        Ok(Self { store, sweeper })
    }

    /// Returns a shared handle to the underlying store.
    pub fn store(&self) -> Arc<EntryStore<V>> {
        Arc::clone(&self.store)
    }

    /// Returns true while a sweeper task is running for this cache.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .is_some_and(|sweeper| !sweeper.is_finished())
    }

    // == Shutdown ==
    /// Stops the sweeper, if any, and waits for it to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        match self.sweeper.take() {
            Some(sweeper) => {
                sweeper.shutdown().await?;
                info!("Cache sweeper shut down");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl<V> Deref for MemoryCache<V> {
    type Target = EntryStore<V>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
