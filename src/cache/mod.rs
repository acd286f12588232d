//! Cache Module
//!
//! Provides an in-process key/value store with sliding or absolute expiration
//! and version-based compare-and-swap updates.

mod entry;
mod memory;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::{CacheEntry, ExpirationKind};
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use store::EntryStore;

// == Public Constants ==
/// Durations shorter than this are treated as "no expiration"
pub const MIN_EXPIRATION: Duration = Duration::from_micros(1);

/// Effective lifetime of entries stored without a meaningful expiration
pub const NO_EXPIRATION: Duration = Duration::from_secs(1_000_000 * 3600);

/// Lower bound for the sweeper tick interval
pub const MIN_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound for the sweeper tick interval
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 3600);

/// Sweeper tick interval used when nothing else is configured
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);
