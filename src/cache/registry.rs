//! Named cache registry.
//!
//! Process-wide owner of the named caches. Callers create a cache
//! idempotently by namespace, hold [`CacheHandle`]s for put/get, and close
//! the cache when its transformation finishes. The registry is usually
//! reached through [`CacheRegistry::global`], but components that want an
//! explicit dependency can construct their own instance.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use metrics::histogram;
use once_cell::sync::Lazy;
use tracing::info;

use crate::domain::attributes::{AttributeMap, SeriesKey};

use super::clock::{Clock, SystemClock};
use super::config::CacheConfig;
use super::error::CacheError;
use super::lock::{rw_read, rw_write};
use super::stats::StatsSnapshot;
use super::store::NamedCache;

const SOURCE: &str = "cache::registry";

const METRIC_CACHE_SWEEP_MS: &str = "sdmx_convert_cache_sweep_ms";

/// Namespace of the cross-sectional transformation lookup cache.
pub const CROSS_SECTIONAL_CACHE: &str = "xsCache";

/// Namespace of the CSV cross-sectional transformation lookup cache.
pub const CSV_CROSS_SECTIONAL_CACHE: &str = "csvXsCache";

static GLOBAL_REGISTRY: Lazy<CacheRegistry> = Lazy::new(CacheRegistry::with_defaults);

/// Owner of all named caches created in this process (or component).
///
/// Creation is idempotent and race-safe per namespace: concurrent creators
/// observe the same cache, and at most one store is ever constructed for a
/// name. One [`CacheConfig`] applies to every cache the registry creates.
pub struct CacheRegistry {
    caches: RwLock<HashMap<String, Arc<NamedCache>>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl CacheRegistry {
    /// Create a registry with a validated configuration.
    ///
    /// An invalid configuration is fatal to the caller: the registry refuses
    /// to construct rather than running with a policy it cannot honor.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            caches: RwLock::new(HashMap::new()),
            config,
            clock: Arc::new(SystemClock),
        })
    }

    /// Create a registry with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            config: CacheConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            config,
            clock,
        }
    }

    /// The process-wide registry, initialized on first access.
    pub fn global() -> &'static CacheRegistry {
        &GLOBAL_REGISTRY
    }

    /// Create the named cache if it does not exist yet, returning a handle.
    ///
    /// An existing cache is left untouched: no reset, no reconfiguration.
    pub fn create_cache(&self, name: &str) -> CacheHandle {
        if let Some(existing) = rw_read(&self.caches, SOURCE, "create_cache").get(name) {
            return CacheHandle {
                cache: Arc::clone(existing),
            };
        }

        let mut caches = rw_write(&self.caches, SOURCE, "create_cache");
        let cache = caches.entry(name.to_string()).or_insert_with(|| {
            info!(
                cache = name,
                idle_expiry_ms = self.config.idle_expiry_ms,
                "named cache created"
            );
            Arc::new(NamedCache::new(name, &self.config, Arc::clone(&self.clock)))
        });
        CacheHandle {
            cache: Arc::clone(cache),
        }
    }

    /// Look up an existing named cache; never creates one.
    pub fn cache(&self, name: &str) -> Option<CacheHandle> {
        rw_read(&self.caches, SOURCE, "cache")
            .get(name)
            .map(|cache| CacheHandle {
                cache: Arc::clone(cache),
            })
    }

    /// Clear a cache's entries and permanently invalidate its handles.
    ///
    /// Only the owning registry closes a cache: a handle this registry
    /// does not currently own, because it was already closed here or was
    /// created by a different registry, is left untouched. Closing twice
    /// is therefore a no-op, and a foreign handle cannot tear down a
    /// same-named cache of ours. An operation racing with the close either
    /// completes against the store before it clears or fails with
    /// [`CacheError::InvalidHandle`]; the store stays consistent either
    /// way. A later [`create_cache`](Self::create_cache) under the same
    /// name yields a fresh cache while handles closed here stay invalid.
    pub fn close_cache(&self, handle: &CacheHandle) {
        let mut caches = rw_write(&self.caches, SOURCE, "close_cache");
        let owned_here = caches
            .get(handle.cache.name())
            .is_some_and(|current| Arc::ptr_eq(current, &handle.cache));
        if !owned_here {
            return;
        }
        caches.remove(handle.cache.name());
        drop(caches);

        handle.cache.close();
    }

    /// Close every named cache. Intended for shutdown.
    pub fn close_all(&self) {
        let mut caches = rw_write(&self.caches, SOURCE, "close_all");
        let closed = caches.len();
        for cache in caches.values() {
            cache.close();
        }
        caches.clear();
        if closed > 0 {
            info!(closed, "all named caches closed");
        }
    }

    /// Drop idle-expired entries from every open cache.
    ///
    /// Lazy expiry on the access path already guarantees expired entries
    /// are never served; sweeping merely bounds memory for long-idle
    /// namespaces.
    pub fn purge_expired(&self) -> usize {
        let sweep_started_at = Instant::now();
        let caches: Vec<Arc<NamedCache>> = rw_read(&self.caches, SOURCE, "purge_expired")
            .values()
            .cloned()
            .collect();

        let mut purged = 0;
        for cache in caches {
            purged += cache.purge_expired();
        }

        histogram!(METRIC_CACHE_SWEEP_MS)
            .record(sweep_started_at.elapsed().as_secs_f64() * 1000.0);
        if purged > 0 {
            info!(purged, "cache sweep complete");
        }
        purged
    }

    /// Spawn the periodic sweeper task on the current tokio runtime.
    ///
    /// Returns `None` when the sweeper is disabled by configuration.
    pub fn spawn_sweeper(self: Arc<Self>) -> Option<tokio::task::JoinHandle<()>> {
        if !self.config.enable_sweeper {
            return None;
        }

        let sweep_interval = self.config.sweep_interval();
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(sweep_interval);
            interval.tick().await; // Skip the first immediate tick
            loop {
                interval.tick().await;
                self.purge_expired();
            }
        }))
    }

    /// Names of the currently open caches.
    pub fn names(&self) -> Vec<String> {
        rw_read(&self.caches, SOURCE, "names")
            .keys()
            .cloned()
            .collect()
    }

    /// Number of currently open caches.
    pub fn cache_count(&self) -> usize {
        rw_read(&self.caches, SOURCE, "cache_count").len()
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Shared reference to one named cache.
///
/// Handles are cheap to clone and safe to use from concurrent callers.
/// Once the cache is closed, every outstanding handle fails fast with
/// [`CacheError::InvalidHandle`].
#[derive(Clone)]
pub struct CacheHandle {
    cache: Arc<NamedCache>,
}

impl CacheHandle {
    /// Namespace this handle points at.
    pub fn name(&self) -> &str {
        self.cache.name()
    }

    /// Store a value under a series key, overwriting any previous entry.
    ///
    /// The key is moved into the cache and owned by it for the lifetime of
    /// the entry. Both inserts and overwrites restart the idle countdown.
    pub fn put(&self, key: SeriesKey, value: AttributeMap) -> Result<(), CacheError> {
        self.cache.put(key, value)
    }

    /// Look up the value stored under a series key.
    ///
    /// A hit restarts the entry's idle countdown. Missing and idle-expired
    /// keys yield `Ok(None)`; absence is a normal outcome, not an error.
    pub fn get(&self, key: &SeriesKey) -> Result<Option<AttributeMap>, CacheError> {
        self.cache.get(key)
    }

    /// Number of stored entries, counting not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the cache behind this handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.cache.is_closed()
    }

    /// Point-in-time statistics for this cache.
    pub fn stats(&self) -> StatsSnapshot {
        self.cache.stats()
    }

    /// Drop this cache's idle-expired entries.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("cache", &self.cache.name())
            .field("closed", &self.cache.is_closed())
            .finish()
    }
}
