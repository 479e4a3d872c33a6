//! In-process caching for conversion lookup structures.
//!
//! A [`CacheRegistry`] owns named caches, each mapping series keys to
//! attribute values with per-entry idle expiry:
//!
//! - **Creation** is lazy and idempotent per namespace
//! - **Access** (read or write) restarts an entry's idle countdown
//! - **Close** clears a cache and permanently invalidates its handles
//!
//! Expired entries are dropped on access; a background sweeper additionally
//! bounds memory for namespaces that go quiet.
//!
//! ## Configuration
//!
//! Cache behavior is controlled via `sdmx-convert.toml`:
//!
//! ```toml
//! [cache]
//! idle_expiry_ms = 1800000
//! sweep_interval_ms = 300000
//! enable_sweeper = true
//! ```

mod clock;
mod config;
mod entry;
mod error;
mod lock;
mod registry;
mod stats;
mod store;

pub use config::CacheConfig;
pub use error::CacheError;
pub use registry::{
    CROSS_SECTIONAL_CACHE, CSV_CROSS_SECTIONAL_CACHE, CacheHandle, CacheRegistry,
};
pub use stats::StatsSnapshot;
