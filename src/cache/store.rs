//! Cache Store Module
//!
//! Main cache engine: a HashMap of entries behind a single reader/writer lock,
//! with lazy expiration on read and version-checked updates.

use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, ExpirationKind};

type EntryMap<V> = HashMap<String, CacheEntry<V>>;

// == Entry Store ==
/// Thread-safe key/value storage with per-entry expiration.
///
/// Pure lookups take the shared lock, every structural change takes the
/// exclusive lock. Expired entries are treated as absent but stay in the map
/// until a recycle pass, `delete` or an overwrite removes them.
#[derive(Debug)]
pub struct EntryStore<V> {
    /// Key-value storage
    entries: RwLock<EntryMap<V>>,
    /// Lookup and reclamation counters
    stats: StatsRecorder,
}

impl<V> Default for EntryStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StatsRecorder::default(),
        }
    }
}

impl<V: Clone> EntryStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Creates or replaces the entry for `key`, resetting its version to 0.
    ///
    /// A `duration` below `MIN_EXPIRATION` stores the value without expiration.
    pub fn put(&self, key: impl Into<String>, value: V, duration: Duration, kind: ExpirationKind) {
        let key = key.into();
        let entry = CacheEntry::new(key.clone(), value, duration, kind);
        self.write().insert(key, entry);
    }

    /// Puts an entry whose deadline is fixed at `now + duration`.
    pub fn put_absolute(&self, key: impl Into<String>, value: V, duration: Duration) {
        self.put(key, value, duration, ExpirationKind::Absolute);
    }

    /// Puts an entry whose deadline moves forward on every access.
    pub fn put_sliding(&self, key: impl Into<String>, value: V, duration: Duration) {
        self.put(key, value, duration, ExpirationKind::Sliding);
    }

    /// Puts an entry that never expires in practice.
    pub fn put_permanent(&self, key: impl Into<String>, value: V) {
        self.put(key, value, Duration::ZERO, ExpirationKind::Absolute);
    }

    // == Add ==
    /// Inserts only if no live entry occupies `key`.
    ///
    /// An expired entry still physically present is overwritten. Returns true
    /// if the value was inserted.
    pub fn add(
        &self,
        key: impl Into<String>,
        value: V,
        duration: Duration,
        kind: ExpirationKind,
    ) -> bool {
        let key = key.into();
        let mut entries = self.write();

        if entries.get(&key).is_some_and(|entry| !entry.is_expired()) {
            return false;
        }

        let entry = CacheEntry::new(key.clone(), value, duration, kind);
        entries.insert(key, entry);
        true
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// Refreshes the deadline of sliding entries.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_versioned(key).map(|(value, _)| value)
    }

    /// Returns the live value together with its current version.
    pub fn get_versioned(&self, key: &str) -> Option<(V, u64)> {
        let entries = self.read();

        match entries.get(key).filter(|entry| !entry.is_expired()) {
            Some(entry) => {
                entry.touch();
                self.stats.record_hit();
                Some((entry.value.clone(), entry.version))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Update ==
    /// Replaces the value of a live entry regardless of its version.
    ///
    /// Returns false if `key` has no live entry.
    pub fn update(&self, key: &str, value: V) -> bool {
        self.apply_update(key, None, value)
    }

    /// Replaces the value only if the entry's version equals `expected_version`.
    ///
    /// Existence, liveness and the version check happen under one exclusive
    /// hold, so two callers racing with the same version cannot both win.
    pub fn update_versioned(&self, key: &str, expected_version: u64, value: V) -> bool {
        self.apply_update(key, Some(expected_version), value)
    }

    fn apply_update(&self, key: &str, expected_version: Option<u64>, value: V) -> bool {
        let mut entries = self.write();

        let Some(entry) = entries.get_mut(key) else {
            return false;
        };
        if entry.is_expired() {
            return false;
        }
        if expected_version.is_some_and(|expected| expected != entry.version) {
            return false;
        }

        entry.replace_value(value);
        true
    }

    // == Delete ==
    /// Removes the entry for `key`, if any.
    pub fn delete(&self, key: &str) {
        self.write().remove(key);
    }

    /// Removes a batch of keys under a single lock acquisition.
    ///
    /// Returns the number of entries actually removed.
    pub fn delete_multi<K: AsRef<str>>(&self, keys: &[K]) -> usize {
        if keys.is_empty() {
            return 0;
        }

        let mut entries = self.write();
        let mut removed = 0;
        for key in keys {
            let key: &str = key.as_ref();
            if entries.remove(key).is_some() {
                removed += 1;
            }
        }

        debug!(requested = keys.len(), removed, "deleted batch of keys");
        removed
    }

    // == Clear ==
    /// Drops every entry by swapping in a fresh map.
    pub fn clear(&self) {
        let previous = std::mem::take(&mut *self.write());
        debug!(dropped = previous.len(), "cache cleared");
    }

    // == Count ==
    /// Returns the number of physically stored entries.
    ///
    /// Expired entries not yet reclaimed are included, so this may be larger
    /// than `keys().len()`.
    pub fn count(&self) -> usize {
        self.read().len()
    }

    // == Exists ==
    /// Returns true if a live entry is stored under `key`.
    ///
    /// Unlike `get` this never refreshes a sliding deadline.
    pub fn exists(&self, key: &str) -> bool {
        self.read().get(key).is_some_and(|entry| !entry.is_expired())
    }

    // == Keys ==
    /// Returns the keys of all live entries, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Recycle ==
    /// Physically removes expired entries and returns how many were dropped.
    ///
    /// Keys are collected under the shared lock, then deleted under the
    /// exclusive lock. Each key is checked again before removal so an entry
    /// rewritten between the two phases survives.
    pub fn recycle(&self) -> usize {
        let expired = self.expired_keys();
        if expired.is_empty() {
            return 0;
        }

        let mut removed = 0;
        {
            let mut entries = self.write();
            for key in &expired {
                if entries.get(key).is_some_and(|entry| entry.is_expired()) {
                    entries.remove(key);
                    removed += 1;
                }
            }
        }

        self.stats.record_reclaimed(removed);
        removed
    }

    fn expired_keys(&self) -> Vec<String> {
        self.read()
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.count())
    }
}

impl<V> EntryStore<V> {
    fn read(&self) -> RwLockReadGuard<'_, EntryMap<V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntryMap<V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: fmt::Debug> EntryStore<V> {
    // == Stat ==
    /// Renders every stored entry, expired ones included, for diagnostics.
    pub fn stat(&self) -> String {
        let entries = self.read();
        let mut out = String::from("start stat\n");

        out.push_str(&format!("Len={}\n", entries.len()));
        for (key, entry) in entries.iter() {
            out.push_str(&format!(
                "key={}; value={:?}; version={}; kind={:?}; expires_at={};\n",
                key,
                entry.value,
                entry.version,
                entry.kind,
                entry.expires_at_utc().to_rfc3339(),
            ));
        }
        out.push_str("end stat\n");
        out
    }
}
