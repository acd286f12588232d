//! Background Tasks Module
//!
//! Contains background tasks that run alongside the cache.
//!
//! # Tasks
//! - Expiration Sweeper: removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::{spawn_sweeper, Sweeper};
