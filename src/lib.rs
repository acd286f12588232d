//! mcache - An in-process key/value cache
//!
//! Provides thread-safe storage with sliding or absolute expiration, lazy
//! expiry on read, a periodic background sweeper and version-based
//! compare-and-swap updates.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStats, EntryStore, ExpirationKind, MemoryCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_sweeper, Sweeper};
