//! Expiration Sweeper
//!
//! Background task that periodically removes expired cache entries.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{EntryStore, MAX_TICK_INTERVAL, MIN_TICK_INTERVAL};
use crate::error::{CacheError, Result};

/// Handle to a running sweeper task.
///
/// Dropping the handle closes the stop channel, which also ends the task.
#[derive(Debug)]
pub struct Sweeper {
    handle: JoinHandle<()>,
    stop: Option<oneshot::Sender<()>>,
}

impl Sweeper {
    /// Signals the task to stop without waiting for it.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The task may already be gone if its store was dropped.
            let _ = stop.send(());
        }
    }

    /// Signals the task to stop and waits until it has exited.
    pub async fn shutdown(mut self) -> Result<()> {
        self.stop();
        self.handle
            .await
            .map_err(|err| CacheError::Sweeper(err.to_string()))
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that recycles expired entries of `store`.
///
/// The task only keeps a weak reference to the store and exits on the first
/// tick after the store has been dropped. The interval is clamped to
/// `MIN_TICK_INTERVAL..=MAX_TICK_INTERVAL` and captured once, at spawn time.
///
/// # Errors
/// Returns `CacheError::NoRuntime` when called outside of a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(EntryStore::<String>::new());
/// let sweeper = spawn_sweeper(&store, Duration::from_secs(1))?;
/// // Later, during shutdown:
/// sweeper.shutdown().await?;
/// ```
pub fn spawn_sweeper<V>(store: &Arc<EntryStore<V>>, interval: Duration) -> Result<Sweeper>
where
    V: Clone + Send + Sync + 'static,
{
    let runtime = Handle::try_current().map_err(|err| CacheError::NoRuntime(err.to_string()))?;
    let interval = interval.clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL);
    let store = Arc::downgrade(store);
    let (stop_tx, stop_rx) = oneshot::channel();

    let handle = runtime.spawn(run(store, interval, stop_rx));

    Ok(Sweeper {
        handle,
        stop: Some(stop_tx),
    })
}

async fn run<V>(store: Weak<EntryStore<V>>, interval: Duration, mut stop: oneshot::Receiver<()>)
where
    V: Clone + Send + Sync + 'static,
{
    info!(?interval, "Starting expiration sweeper");

    let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(store) = store.upgrade() else {
                    debug!("Cache dropped, sweeper has nothing left to watch");
                    break;
                };

                let removed = store.recycle();
                if removed > 0 {
                    info!("Expiration sweep: removed {} expired entries", removed);
                } else {
                    debug!("Expiration sweep: no expired entries found");
                }
            }
            _ = &mut stop => break,
        }
    }

    info!("Expiration sweeper stopped");
}
