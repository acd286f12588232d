//! Cache Entry Module
//!
//! Defines individual cache entries with their expiration policy and version.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::cache::{MIN_EXPIRATION, NO_EXPIRATION};

// == Expiration Kind ==
/// How an entry's deadline reacts to access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationKind {
    /// Every successful access pushes the deadline back by the entry's duration.
    #[default]
    Sliding,
    /// The deadline is fixed when the entry is written.
    Absolute,
}

// == Cache Entry ==
/// A single stored value plus its metadata.
///
/// `expires_at` is kept in an atomic so that sliding entries can be touched
/// while the store only holds its shared lock.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Bumped by one on every successful update, 0 for a fresh entry
    pub version: u64,
    /// Sliding or absolute expiration
    pub kind: ExpirationKind,
    /// Requested span, `Duration::ZERO` when the entry never expires
    pub duration: Duration,
    /// Deadline in nanoseconds on the process clock (see `current_timestamp_ns`)
    expires_at: AtomicU64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry with version 0.
    ///
    /// A `duration` below `MIN_EXPIRATION` produces a non-expiring entry whose
    /// deadline sits `NO_EXPIRATION` in the future.
    pub fn new(key: String, value: V, duration: Duration, kind: ExpirationKind) -> Self {
        let now = current_timestamp_ns();
        let (duration, span) = if duration < MIN_EXPIRATION {
            (Duration::ZERO, NO_EXPIRATION)
        } else {
            (duration, duration)
        };

        Self {
            key,
            value,
            version: 0,
            kind,
            duration,
            expires_at: AtomicU64::new(now.saturating_add(duration_ns(span))),
        }
    }

    // == Is Permanent ==
    /// Returns true if the entry was stored without a meaningful expiration.
    pub fn is_permanent(&self) -> bool {
        self.duration.is_zero()
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is strictly past its deadline.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ns() > self.expires_at_ns()
    }

    // == Touch ==
    /// Refreshes the deadline of a sliding entry to now + duration.
    ///
    /// Uses `fetch_max` so that racing touches can only extend the deadline.
    /// Absolute and permanent entries are left alone.
    pub fn touch(&self) {
        if self.kind != ExpirationKind::Sliding || self.is_permanent() {
            return;
        }

        let deadline = current_timestamp_ns().saturating_add(duration_ns(self.duration));
        self.expires_at.fetch_max(deadline, Ordering::AcqRel);
    }

    // == Replace Value ==
    /// Stores a new value, bumps the version and touches the entry.
    pub fn replace_value(&mut self, value: V) {
        self.value = value;
        self.version += 1;
        self.touch();
    }

    /// Returns the raw deadline in nanoseconds on the process clock.
    pub fn expires_at_ns(&self) -> u64 {
        self.expires_at.load(Ordering::Acquire)
    }

    // == Time To Live ==
    /// Returns the time left before the entry expires, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        Duration::from_nanos(self.expires_at_ns().saturating_sub(current_timestamp_ns()))
    }

    /// Converts the monotonic deadline into a wall-clock timestamp.
    ///
    /// Only meant for diagnostics; the monotonic deadline stays authoritative.
    pub fn expires_at_utc(&self) -> DateTime<Utc> {
        let now_ns = current_timestamp_ns();
        let expires_ns = self.expires_at_ns();
        let offset = if expires_ns >= now_ns {
            chrono::Duration::nanoseconds(clamp_i64(expires_ns - now_ns))
        } else {
            -chrono::Duration::nanoseconds(clamp_i64(now_ns - expires_ns))
        };

        Utc::now()
            .checked_add_signed(offset)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// == Utility Functions ==
/// Returns nanoseconds elapsed on a monotonic clock shared by the whole process.
pub fn current_timestamp_ns() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = *EPOCH.get_or_init(Instant::now);
    duration_ns(epoch.elapsed())
}

fn duration_ns(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation_absolute() {
        let entry = CacheEntry::new(
            "k".to_string(),
            "v".to_string(),
            Duration::from_secs(60),
            ExpirationKind::Absolute,
        );

        assert_eq!(entry.key, "k");
        assert_eq!(entry.value, "v");
        assert_eq!(entry.version, 0);
        assert!(!entry.is_permanent());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_below_min_expiration_is_permanent() {
        let entry = CacheEntry::new("k".to_string(), 1, Duration::ZERO, ExpirationKind::Absolute);

        assert!(entry.is_permanent());
        assert_eq!(entry.duration, Duration::ZERO);
        assert!(entry.ttl_remaining() > Duration::from_secs(3600 * 24 * 365));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_absolute_expiration() {
        let entry = CacheEntry::new(
            "k".to_string(),
            1,
            Duration::from_millis(20),
            ExpirationKind::Absolute,
        );

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(40));
        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_touch_extends_sliding_entry() {
        let entry = CacheEntry::new(
            "k".to_string(),
            1,
            Duration::from_millis(50),
            ExpirationKind::Sliding,
        );
        let before = entry.expires_at_ns();

        sleep(Duration::from_millis(10));
        entry.touch();

        assert!(entry.expires_at_ns() > before);
    }

    #[test]
    fn test_touch_ignores_absolute_entry() {
        let entry = CacheEntry::new(
            "k".to_string(),
            1,
            Duration::from_millis(50),
            ExpirationKind::Absolute,
        );
        let before = entry.expires_at_ns();

        sleep(Duration::from_millis(10));
        entry.touch();

        assert_eq!(entry.expires_at_ns(), before);
    }

    #[test]
    fn test_touch_ignores_permanent_sliding_entry() {
        let entry = CacheEntry::new("k".to_string(), 1, Duration::ZERO, ExpirationKind::Sliding);
        let before = entry.expires_at_ns();

        sleep(Duration::from_millis(5));
        entry.touch();

        assert_eq!(entry.expires_at_ns(), before);
    }

    #[test]
    fn test_replace_value_bumps_version() {
        let mut entry = CacheEntry::new(
            "k".to_string(),
            "a",
            Duration::from_secs(10),
            ExpirationKind::Sliding,
        );

        entry.replace_value("b");
        entry.replace_value("c");

        assert_eq!(entry.value, "c");
        assert_eq!(entry.version, 2);
    }

    #[test]
    fn test_expires_at_utc_is_in_future() {
        let entry = CacheEntry::new(
            "k".to_string(),
            1,
            Duration::from_secs(60),
            ExpirationKind::Absolute,
        );

        let expires = entry.expires_at_utc();
        assert!(expires > Utc::now());
        assert!(expires < Utc::now() + chrono::Duration::seconds(61));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let a = current_timestamp_ns();
        let b = current_timestamp_ns();
        assert!(b >= a);
    }
}
