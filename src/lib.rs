//! Model types and in-process caching layer for SDMX data format
//! conversion.
//!
//! Cross-sectional transformations keep their lookup structures in named
//! caches owned by a [`cache::CacheRegistry`]. Caches are created lazily
//! and idempotently by namespace, entries expire after a configurable idle
//! window, and closing a cache invalidates every outstanding handle:
//!
//! ```
//! use sdmx_convert_core::cache::{CROSS_SECTIONAL_CACHE, CacheRegistry};
//! use sdmx_convert_core::domain::attributes::{AttributeMap, SeriesKey};
//!
//! let registry = CacheRegistry::with_defaults();
//! let lookups = registry.create_cache(CROSS_SECTIONAL_CACHE);
//!
//! let key: SeriesKey = [("FREQ", "A"), ("REF_AREA", "IT")].into_iter().collect();
//! let mut value = AttributeMap::new();
//! value.insert("OBS_VALUE", "3.5");
//!
//! lookups.put(key.clone(), value)?;
//! assert!(lookups.get(&key)?.is_some());
//!
//! registry.close_cache(&lookups);
//! assert!(lookups.get(&key).is_err());
//! # Ok::<(), sdmx_convert_core::cache::CacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod telemetry;
