//! mcache demo
//!
//! Walks through the cache contract: expiration kinds, add, CAS updates,
//! bulk deletes and the background sweeper, then prints the diagnostics.

use std::time::Duration;

use anyhow::Context;
use mcache::{Config, ExpirationKind, MemoryCache};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache, starting the sweeper if enabled
/// 4. Exercise the cache operations
/// 5. Print stat dump and statistics, then shut down
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: expire={}, tick_interval={}s",
        config.expire,
        config.effective_tick_interval().as_secs()
    );

    let cache = MemoryCache::<String>::with_config(&config).context("failed to create cache")?;

    // Absolute expiration: gone once the span elapses, reads do not help
    cache.put_absolute("session", "abc123".to_string(), Duration::from_millis(100));
    info!("session before expiry: {:?}", cache.get("session"));
    tokio::time::sleep(Duration::from_millis(150)).await;
    info!("session after expiry: {:?}", cache.get("session"));

    // Sliding expiration: kept alive by reads
    cache.put_sliding("profile", "alice".to_string(), Duration::from_millis(100));
    for _ in 0..5 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        info!("profile while read regularly: {:?}", cache.get("profile"));
    }
    tokio::time::sleep(Duration::from_millis(150)).await;
    info!("profile after idle span: {:?}", cache.get("profile"));

    // Add only wins once per live key
    let lease = Duration::from_secs(30);
    let first = cache.add("lock", "worker-1".to_string(), lease, ExpirationKind::Absolute);
    let second = cache.add("lock", "worker-2".to_string(), lease, ExpirationKind::Absolute);
    info!(
        "add lock: first={}, second={}, holder={:?}",
        first,
        second,
        cache.get("lock")
    );

    // Compare-and-swap on the entry version
    cache.put_permanent("config", "v1".to_string());
    if let Some((value, version)) = cache.get_versioned("config") {
        let applied = cache.update_versioned("config", version, format!("{value}+patch"));
        let stale = cache.update_versioned("config", version, "lost update".to_string());
        info!("cas: applied={}, stale attempt={}", applied, stale);
    }
    info!("config now: {:?}", cache.get_versioned("config"));

    cache.delete_multi(&["lock", "missing"]);
    info!(
        "count={} (may include expired), live keys={:?}",
        cache.count(),
        cache.keys()
    );

    let reclaimed = cache.recycle();
    info!("manual recycle removed {} entries", reclaimed);

    println!("{}", cache.stat());
    println!(
        "{}",
        serde_json::to_string_pretty(&cache.stats()).context("failed to encode stats")?
    );

    cache.shutdown().await?;
    info!("Demo complete");
    Ok(())
}
