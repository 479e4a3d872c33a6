//! Named cache storage.
//!
//! One `NamedCache` holds the entries of a single namespace: series keys
//! mapped to attribute values, each with an idle-expiry countdown that
//! resets on every access. Expiry is enforced on the access path, so an
//! idle-expired entry is never observable regardless of sweeper cadence.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use metrics::{counter, gauge};
use tracing::{debug, info, trace, warn};

use crate::domain::attributes::{AttributeMap, SeriesKey};

use super::clock::Clock;
use super::config::CacheConfig;
use super::entry::CacheEntry;
use super::error::CacheError;
use super::stats::{CacheStats, StatsSnapshot};

const METRIC_CACHE_HIT_TOTAL: &str = "sdmx_convert_cache_hit_total";
const METRIC_CACHE_MISS_TOTAL: &str = "sdmx_convert_cache_miss_total";
const METRIC_CACHE_INSERT_TOTAL: &str = "sdmx_convert_cache_insert_total";
const METRIC_CACHE_EXPIRE_TOTAL: &str = "sdmx_convert_cache_expire_total";
const METRIC_CACHE_ENTRIES: &str = "sdmx_convert_cache_entries";

/// Entry store for one cache namespace.
///
/// Owned by the registry; callers interact through handles. The closed flag
/// is checked on every operation so outstanding handles fail fast once the
/// cache has been released.
pub(crate) struct NamedCache {
    name: String,
    entries: DashMap<SeriesKey, CacheEntry>,
    idle_ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
    closed: AtomicBool,
}

impl NamedCache {
    pub(crate) fn new(name: &str, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.to_string(),
            entries: DashMap::new(),
            idle_ttl: config.idle_expiry(),
            clock,
            stats: CacheStats::default(),
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self, op: &'static str) -> Result<(), CacheError> {
        if self.is_closed() {
            warn!(cache = %self.name, op, "operation on closed cache handle");
            return Err(CacheError::invalid_handle(&self.name));
        }
        Ok(())
    }

    /// Store a value, overwriting any entry under the same key.
    ///
    /// Both fresh inserts and overwrites restart the idle countdown.
    pub(crate) fn put(&self, key: SeriesKey, value: AttributeMap) -> Result<(), CacheError> {
        self.ensure_open("put")?;

        let now = self.clock.now();
        self.entries.insert(key, CacheEntry::new(value, now));
        self.stats.record_insertion();

        counter!(METRIC_CACHE_INSERT_TOTAL, "cache" => self.name.clone()).increment(1);
        gauge!(METRIC_CACHE_ENTRIES, "cache" => self.name.clone())
            .set(self.entries.len() as f64);
        trace!(cache = %self.name, entries = self.entries.len(), "cache entry stored");
        Ok(())
    }

    /// Look up a value; a hit restarts the idle countdown.
    ///
    /// Missing and idle-expired keys both yield `Ok(None)`.
    pub(crate) fn get(&self, key: &SeriesKey) -> Result<Option<AttributeMap>, CacheError> {
        self.ensure_open("get")?;

        let now = self.clock.now();
        let Some(mut entry) = self.entries.get_mut(key) else {
            self.record_lookup_miss("miss");
            return Ok(None);
        };

        if entry.is_idle_expired(now, self.idle_ttl) {
            // Guard must be released before touching the same key again.
            drop(entry);
            let removed = self
                .entries
                .remove_if(key, |_, candidate| {
                    candidate.is_idle_expired(now, self.idle_ttl)
                })
                .is_some();
            if removed {
                self.stats.record_expirations(1);
                counter!(METRIC_CACHE_EXPIRE_TOTAL, "cache" => self.name.clone()).increment(1);
                gauge!(METRIC_CACHE_ENTRIES, "cache" => self.name.clone())
                    .set(self.entries.len() as f64);
            }
            self.record_lookup_miss("expired");
            return Ok(None);
        }

        entry.touch(now);
        let value = entry.value.clone();
        drop(entry);

        self.stats.record_hit();
        counter!(METRIC_CACHE_HIT_TOTAL, "cache" => self.name.clone()).increment(1);
        debug!(cache = %self.name, outcome = "hit", "cache lookup");
        Ok(Some(value))
    }

    fn record_lookup_miss(&self, outcome: &'static str) {
        self.stats.record_miss();
        counter!(METRIC_CACHE_MISS_TOTAL, "cache" => self.name.clone()).increment(1);
        debug!(cache = %self.name, outcome, "cache lookup");
    }

    /// Number of stored entries, counting not-yet-purged expired ones.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop every entry whose idle window has elapsed.
    pub(crate) fn purge_expired(&self) -> usize {
        if self.is_closed() {
            return 0;
        }

        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_idle_expired(now, self.idle_ttl));
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            self.stats.record_expirations(removed as u64);
            counter!(METRIC_CACHE_EXPIRE_TOTAL, "cache" => self.name.clone())
                .increment(removed as u64);
            gauge!(METRIC_CACHE_ENTRIES, "cache" => self.name.clone())
                .set(self.entries.len() as f64);
            debug!(cache = %self.name, removed, "idle-expired entries purged");
        }
        removed
    }

    /// Clear all entries and mark the cache closed.
    ///
    /// Returns false when the cache was already closed. Operations racing
    /// with the clear either complete first or observe the closed flag; the
    /// entry store stays consistent either way.
    pub(crate) fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.entries.clear();
        gauge!(METRIC_CACHE_ENTRIES, "cache" => self.name.clone()).set(0.0);
        info!(cache = %self.name, "named cache closed");
        true
    }

    pub(crate) fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.entries.len())
    }
}
