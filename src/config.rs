//! Configuration Module
//!
//! Handles loading cache settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_TICK_INTERVAL, MAX_TICK_INTERVAL, MIN_TICK_INTERVAL};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the background sweeper should run
    pub expire: bool,
    /// Interval between sweeper passes
    pub tick_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EXPIRE` - Start the background sweeper (default: true)
    /// - `TICK_INTERVAL` - Sweeper interval in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            expire: env::var("EXPIRE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.expire),
            tick_interval: env::var("TICK_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.tick_interval),
        }
    }

    /// Returns the tick interval clamped to `MIN_TICK_INTERVAL..=MAX_TICK_INTERVAL`.
    pub fn effective_tick_interval(&self) -> Duration {
        self.tick_interval.clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            expire: true,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}
