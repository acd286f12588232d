//! Cache Statistics Module
//!
//! Tracks lookup hits and misses plus entries reclaimed by the sweeper.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that found a live entry
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Number of expired entries physically removed by recycle passes
    pub reclaimed: u64,
    /// Entries physically stored, possibly including expired ones
    pub total_entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Lock-free counters updated from the store's read and write paths.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    reclaimed: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reclaimed(&self, count: usize) {
        self.reclaimed.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Builds a snapshot, pairing the counters with the current entry count.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            reclaimed: self.reclaimed.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.reclaimed, 0);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();

        let stats = recorder.snapshot(3);
        assert_eq!(stats.hit_rate(), 0.75);
        assert_eq!(stats.total_entries, 3);
    }

    #[test]
    fn test_record_reclaimed_accumulates() {
        let recorder = StatsRecorder::default();
        recorder.record_reclaimed(2);
        recorder.record_reclaimed(5);
        assert_eq!(recorder.snapshot(0).reclaimed, 7);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats {
            hits: 4,
            misses: 1,
            reclaimed: 2,
            total_entries: 9,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hits"], 4);
        assert_eq!(json["misses"], 1);
        assert_eq!(json["reclaimed"], 2);
        assert_eq!(json["total_entries"], 9);
    }
}
