//! Per-cache statistics counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free event counters for one named cache.
///
/// Counters are monotonic over the cache's lifetime; clearing entries does
/// not reset them. Relaxed ordering is sufficient since the counts are
/// advisory and never synchronize other state.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    expirations: AtomicU64,
}

impl CacheStats {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_insertion(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expirations(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries,
        }
    }
}

/// Point-in-time view of one cache's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Lookups that returned a live entry.
    pub hits: u64,
    /// Lookups that found nothing, including idle-expired entries.
    pub misses: u64,
    /// Entries stored, counting overwrites.
    pub insertions: u64,
    /// Entries dropped because their idle window elapsed.
    pub expirations: u64,
    /// Entries currently stored.
    pub entries: usize,
}

impl StatsSnapshot {
    /// Fraction of lookups served from the cache, in `0.0..=1.0`.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}
