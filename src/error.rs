//! Error types for the cache
//!
//! Cache operations report "not found" and "conflict" through their return
//! values. This enum only covers lifecycle failures of the cache itself.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The sweeper was requested outside of a tokio runtime
    #[error("No tokio runtime available to run the sweeper: {0}")]
    NoRuntime(String),

    /// The sweeper task panicked or was cancelled before it could be joined
    #[error("Sweeper task failed: {0}")]
    Sweeper(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
